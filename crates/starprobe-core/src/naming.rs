//! Generational probe naming.
//!
//! A probe name is three dash-separated groups of three letters:
//! birthplace of the child, birthplace of the parent, and a base-26
//! generation sequence. `SOL-SOL-AAA` replicating at Proxima Centauri
//! produces `PRO-SOL-AAB`. Fully deterministic; no randomness.

/// Derive a child's name from its parent's name and the name of the star
/// the parent replicated at. Output is always upper-cased.
#[must_use]
pub fn child_name(parent: &str, location: &str) -> String {
    let location_group = prefix_group(location);
    let parent_group = prefix_group(parent);
    let sequence = next_sequence(trailing_sequence(parent));
    format!("{location_group}-{parent_group}-{sequence}")
}

/// Advance a three-letter generation sequence one step: the rightmost
/// letter increments first, carrying leftward. Saturates at `ZZZ` instead
/// of wrapping, capping a lineage at 17,576 generations.
#[must_use]
pub fn next_sequence(sequence: &str) -> String {
    let mut letters: Vec<u8> = sequence
        .to_uppercase()
        .bytes()
        .map(|b| if b.is_ascii_uppercase() { b } else { b'Z' })
        .collect();
    letters.resize(3, b'A');

    for slot in (0..letters.len()).rev() {
        if letters[slot] < b'Z' {
            letters[slot] += 1;
            for reset in &mut letters[slot + 1..] {
                *reset = b'A';
            }
            return String::from_utf8_lossy(&letters).into_owned();
        }
    }
    "ZZZ".to_string()
}

/// First three characters of a name, upper-cased, padded with `X` for
/// names shorter than three characters.
fn prefix_group(name: &str) -> String {
    let mut group: String = name.chars().take(3).flat_map(char::to_uppercase).collect();
    while group.chars().count() < 3 {
        group.push('X');
    }
    group
}

/// The trailing three-letter generation group of a probe name, or `AAA`
/// for names too short to carry one.
fn trailing_sequence(name: &str) -> &str {
    if name.len() >= 3 && name.is_char_boundary(name.len() - 3) {
        &name[name.len() - 3..]
    } else {
        "AAA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sol_lineage_example() {
        assert_eq!(child_name("SOL-SOL-AAA", "Proxima Centauri"), "PRO-SOL-AAB");
    }

    #[test]
    fn grandchild_carries_parent_birthplace() {
        assert_eq!(child_name("PRO-SOL-AAB", "Barnard's Star"), "BAR-PRO-AAC");
    }

    #[test]
    fn output_is_uppercased() {
        assert_eq!(child_name("sol-sol-aaa", "vega"), "VEG-SOL-AAB");
    }

    #[test]
    fn sequence_increments_rightmost_first() {
        assert_eq!(next_sequence("AAA"), "AAB");
        assert_eq!(next_sequence("AAY"), "AAZ");
    }

    #[test]
    fn sequence_carries_leftward() {
        assert_eq!(next_sequence("AAZ"), "ABA");
        assert_eq!(next_sequence("AZZ"), "BAA");
        assert_eq!(next_sequence("YZZ"), "ZAA");
    }

    #[test]
    fn sequence_saturates_at_zzz() {
        assert_eq!(next_sequence("ZZZ"), "ZZZ");
        assert_eq!(next_sequence(&next_sequence("ZZZ")), "ZZZ");
    }

    #[test]
    fn short_location_is_padded() {
        assert_eq!(child_name("SOL-SOL-AAA", "Io"), "IOX-SOL-AAB");
    }
}
