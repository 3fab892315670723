use uuid::Uuid;

/// Generera ett nytt unikt id för medlemmar, patruller och sessioner.
/// Id:n är opaka strängar och återanvänds aldrig.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
        assert!(!a.is_empty());
    }
}
