/// Splits a callback payload into `(verb, entity_id)`. Payloads are built as
/// `verb_entityid` where the verb itself may contain underscores
/// (`approve_interaction_...`), so the split happens at the last one.
pub fn parse_callback(data: &str) -> Option<(&str, &str)> {
    let (verb, entity_id) = data.rsplit_once('_')?;
    if verb.is_empty() || entity_id.is_empty() {
        return None;
    }
    Some((verb, entity_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_approve_payload() {
        let (verb, id) = parse_callback("approve_interaction_665f1c2ab1d2c3d4e5f60718").unwrap();

        assert_eq!(verb, "approve_interaction");
        assert_eq!(id, "665f1c2ab1d2c3d4e5f60718");

        println!("✅ 测试通过: parse_approve_payload");
    }

    #[test]
    fn test_parse_claim_payloads() {
        assert_eq!(parse_callback("claim_follow_abc").unwrap(), ("claim_follow", "abc"));
        assert_eq!(parse_callback("claim_video_abc").unwrap(), ("claim_video", "abc"));
        assert_eq!(parse_callback("claim_live_abc").unwrap(), ("claim_live", "abc"));
    }

    #[test]
    fn test_garbage_payloads_are_rejected() {
        assert!(parse_callback("menu").is_none());
        assert!(parse_callback("_abc").is_none());
        assert!(parse_callback("approve_").is_none());
        assert!(parse_callback("").is_none());
    }
}
