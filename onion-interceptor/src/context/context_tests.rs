//! Tests for the context module.

#[cfg(test)]
mod tests {
    use crate::context::Context;
    use serde_json::json;

    #[test]
    fn test_context_creation() {
        let ctx = Context::new(vec![json!("/users")], json!({"baseURL": "https://api.test.com/"}));

        assert_eq!(ctx.args, vec![json!("/users")]);
        assert_eq!(ctx.cfg["baseURL"], "https://api.test.com/");
        assert!(ctx.res.is_none());
        assert!(!ctx.has_response());
        assert!(ctx.extensions().is_empty());
    }

    #[test]
    fn test_context_ids_are_unique() {
        let a = Context::empty();
        let b = Context::empty();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_context_default_is_empty() {
        let ctx = Context::default();
        assert!(ctx.args.is_empty());
        assert!(ctx.cfg.is_null());
    }

    #[test]
    fn test_context_arg() {
        let ctx = Context::new(vec![json!("/a"), json!({"method": "POST"})], json!(null));

        assert_eq!(ctx.arg(1).and_then(|v| v["method"].as_str()), Some("POST"));
        assert!(ctx.arg(2).is_none());
    }

    #[test]
    fn test_context_extensions() {
        let mut ctx = Context::empty().with_extension("tenant", "acme");
        ctx.insert("attempt", 1);

        assert_eq!(ctx.get("tenant"), Some(&json!("acme")));
        assert_eq!(ctx.get_as::<u32>("attempt"), Some(1));
        assert_eq!(ctx.remove("attempt"), Some(json!(1)));
        assert!(ctx.get("attempt").is_none());
    }

    #[test]
    fn test_context_take_res() {
        let mut ctx = Context::empty();
        ctx.res = Some(json!({"ok": true}));

        assert!(ctx.has_response());
        assert_eq!(ctx.take_res(), Some(json!({"ok": true})));
        assert!(!ctx.has_response());
    }

    #[test]
    fn test_context_created_at_is_recent() {
        let before = chrono::Utc::now();
        let ctx = Context::empty();
        assert!(ctx.created_at() >= before);
    }
}
