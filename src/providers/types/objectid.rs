use uuid::Uuid;

/// Prefixed random identifier, e.g. `msg_3f2a...` or `req_91c0...`.
pub fn create_object_id(prefix: &str) -> String {
    format!("{}_{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_object_id_format() {
        let id = create_object_id("req");
        assert!(id.starts_with("req_"));
        assert_eq!(id.len(), "req_".len() + 32);
    }

    #[test]
    fn test_create_object_id_uniqueness() {
        assert_ne!(create_object_id("msg"), create_object_id("msg"));
    }
}
