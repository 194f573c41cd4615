//! Slug normalization for Battle.net URL paths
//!
//! Realm, guild and character names are placed in request paths in slug form:
//! lowercase, spaces replaced with hyphens, apostrophes stripped.

/// Convert a display name into its Battle.net slug
///
/// ```
/// use armory_common::slug::slugify;
///
/// assert_eq!(slugify("Area 52"), "area-52");
/// assert_eq!(slugify("Kel'Thuzad"), "kelthuzad");
/// assert_eq!(slugify(&slugify("Kel'Thuzad")), "kelthuzad");
/// ```
pub fn slugify(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '\'')
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases() {
        assert_eq!(slugify("Stormrage"), "stormrage");
        assert_eq!(slugify("ARTHAS"), "arthas");
    }

    #[test]
    fn test_spaces_become_hyphens() {
        assert_eq!(slugify("Twisting Nether"), "twisting-nether");
        assert_eq!(slugify("Knights of the Ebon Blade"), "knights-of-the-ebon-blade");
    }

    #[test]
    fn test_apostrophes_removed() {
        assert_eq!(slugify("Mal'Ganis"), "malganis");
        assert_eq!(slugify("Kil'jaeden"), "kiljaeden");
    }

    #[test]
    fn test_combined() {
        assert_eq!(slugify("Zul'jin's Raiders"), "zuljins-raiders");
    }

    #[test]
    fn test_non_ascii_lowercased() {
        assert_eq!(slugify("Drakthül"), "drakthül");
        assert_eq!(slugify("ÉLUNE"), "élune");
    }

    #[test]
    fn test_idempotent() {
        for input in ["Area 52", "Mal'Ganis", "Twisting Nether", "already-a-slug", ""] {
            let once = slugify(input);
            assert_eq!(slugify(&once), once, "slugify not idempotent for {:?}", input);
        }
    }
}
