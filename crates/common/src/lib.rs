//! Shared building blocks used by every crate in the workspace:
//! logging bootstrap, password hashing and small response types.

pub mod types;
pub mod crypto;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn message_serializes_as_object() {
        let m = types::Message::new("done");
        let v = serde_json::to_value(&m).unwrap();
        assert_eq!(v["message"], "done");
    }
}
