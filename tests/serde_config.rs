//! Serde integration: operator configuration and host-facing records.
//!
//! Run with: `cargo test --features serde`

#[cfg(feature = "serde")]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use teamtap_core::{
        ContactId, Mode, NoticeLog, Position, RenderLog, Session, SessionConfig, StatusReport,
    };

    /// A host can ship the operator settings as JSON and start a session from them.
    #[test]
    fn test_config_from_json() {
        let json = r#"{ "capacity": 6, "mode": "Discrete", "sim_padding": 40.0 }"#;
        let cfg: SessionConfig = serde_json::from_str(json).expect("config parses");
        assert_eq!(cfg.capacity, 6);
        assert_eq!(cfg.mode, Mode::Discrete);

        let s = Session::new(cfg, RenderLog::new(), NoticeLog::new(), StdRng::seed_from_u64(1))
            .expect("valid config");
        assert_eq!(s.status(), StatusReport::Tapping { count: 0, capacity: 6 });
    }

    /// Odd capacities parse but are refused when the session starts.
    #[test]
    fn test_odd_capacity_rejected_after_parse() {
        let cfg: SessionConfig =
            serde_json::from_str(r#"{ "capacity": 3, "mode": "Continuous", "sim_padding": 0.0 }"#)
                .unwrap();
        assert!(cfg.validate().is_err());
    }

    /// Token records serialise with the tagged contact id and role.
    #[test]
    fn test_token_record_json_shape() {
        let mut s = Session::new(
            SessionConfig { capacity: 2, ..SessionConfig::default() },
            RenderLog::new(),
            NoticeLog::new(),
            StdRng::seed_from_u64(3),
        )
        .unwrap();
        s.contact_start(7, Position::new(1.0, 2.0)).unwrap();

        let rec = s.registry().get(ContactId::Contact(7)).unwrap();
        let v = serde_json::to_value(rec).unwrap();
        assert_eq!(v["id"]["Contact"], 7);
        assert_eq!(v["label"], 1);
        assert_eq!(v["role"], "None");
        assert_eq!(v["position"]["x"], 1.0);
    }
}
