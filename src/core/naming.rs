//! Purpose: Translate between protocol field names and domain field names.
//! Exports: `to_domain_name`, `to_protocol_name`, `is_round_trip`.
//! Role: Single naming seam used by the builder and by JSON re-encoding.
//! Invariants: Protocol names are lowercase words joined by `_`; domain names are lowerCamelCase.
//! Invariants: Both directions are pure; invertibility is checked at registry build time.

/// `first_name` -> `firstName`.
pub fn to_domain_name(protocol_name: &str) -> String {
    let mut out = String::with_capacity(protocol_name.len());
    let mut upper_next = false;
    for ch in protocol_name.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `firstName` -> `first_name`.
pub fn to_protocol_name(domain_name: &str) -> String {
    let mut out = String::with_capacity(domain_name.len() + 4);
    for ch in domain_name.chars() {
        if ch.is_uppercase() {
            out.push('_');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// True when `protocol_name` survives a domain round trip unchanged.
///
/// Names with digits after `_`, doubled or trailing underscores, or
/// uppercase letters fail this check.
pub fn is_round_trip(protocol_name: &str) -> bool {
    to_protocol_name(&to_domain_name(protocol_name)) == protocol_name
}

#[cfg(test)]
mod tests {
    use super::{is_round_trip, to_domain_name, to_protocol_name};

    #[test]
    fn protocol_names_become_camel_case() {
        assert_eq!(to_domain_name("id"), "id");
        assert_eq!(to_domain_name("first_name"), "firstName");
        assert_eq!(
            to_domain_name("all_members_are_administrators"),
            "allMembersAreAdministrators"
        );
    }

    #[test]
    fn domain_names_become_snake_case() {
        assert_eq!(to_protocol_name("inviteLink"), "invite_link");
        assert_eq!(to_protocol_name("canSetStickerSet"), "can_set_sticker_set");
        assert_eq!(to_protocol_name("type"), "type");
    }

    #[test]
    fn declared_style_names_round_trip() {
        for name in ["id", "sticker_set_name", "pinned_message", "from"] {
            assert!(is_round_trip(name), "{name} should round trip");
            assert_eq!(to_protocol_name(&to_domain_name(name)), name);
        }
    }

    #[test]
    fn ambiguous_names_are_detected() {
        assert!(!is_round_trip("photo_2"));
        assert!(!is_round_trip("trailing_"));
        assert!(!is_round_trip("double__underscore"));
        assert!(!is_round_trip("camelCase"));
    }
}
