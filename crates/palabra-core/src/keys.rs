//! Key design for the shared cache namespace. Suggestion lists live under the
//! raw query string; detail lists and job identities carry a word prefix.

pub fn details_key(word: &str) -> String {
    format!("details_{word}")
}

pub fn job_id(word: &str) -> String {
    format!("update_details_{word}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_deterministic_per_word() {
        assert_eq!(details_key("casa"), "details_casa");
        assert_eq!(job_id("casa"), "update_details_casa");
        assert_eq!(details_key("café"), "details_café");
    }
}
