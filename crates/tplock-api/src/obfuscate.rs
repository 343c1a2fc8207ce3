// Password obfuscation
//
// The router's web UI never sends the password in clear. Its login page
// XORs the password against a fixed salt and maps each result into a
// fixed 255-character alphabet. The router compares the result verbatim,
// so any deviation here fails login with nothing but a non-zero
// `error_code`. This is a wire-format shim, not a cipher.

/// Salt embedded in the router's login page.
pub const SALT: &str = "RDpbLfCPsJZ7fiv";

/// Substitution alphabet embedded in the router's login page.
pub const ALPHABET: &str = "yLwVl0zKqws7LgKPRQ84Mdt708T1qQ3Ha7xv3H7NyU84p21BriUWBU43odz3iP4rBL3cD02KZciXTysVXiV8ngg6vL48rPJyAUw0HurW20xqxv9aYb4M9wK1Ae0wlro510qXeU07kV57fQMc8L6aLgMLwygtc0F10a0Dg70TOoouyFhdysuRMO51yY5ZlOZZLEal1h0t9YQW0Ko7oBwmCAHoic4HYbUyVeU3sfQ1xtXcPcf1aT303wAQhv66qzW";

/// Code point substituted for whichever of password/salt runs out first.
const PAD: u32 = 187;

/// Obfuscate `password` with an arbitrary salt and alphabet.
///
/// Walks `max(len(password), len(salt))` positions (counted in code
/// points), XORs the two code points (padding the shorter side with 187)
/// and emits `alphabet[x % len(alphabet)]`. The output always has as many
/// characters as the longer input. An empty alphabet yields an empty
/// string.
pub fn encode(password: &str, salt: &str, alphabet: &str) -> String {
    let alphabet: Vec<char> = alphabet.chars().collect();
    if alphabet.is_empty() {
        return String::new();
    }

    let mut password = password.chars().map(u32::from);
    let mut salt = salt.chars().map(u32::from);
    let mut out = String::new();

    loop {
        let (k, l) = match (password.next(), salt.next()) {
            (None, None) => break,
            (k, l) => (k.unwrap_or(PAD), l.unwrap_or(PAD)),
        };
        let index = usize::try_from(k ^ l).unwrap_or(usize::MAX) % alphabet.len();
        out.extend(alphabet.get(index));
    }

    out
}

/// Obfuscate `password` with the router's embedded salt and alphabet.
pub fn encode_password(password: &str) -> String {
    encode(password, SALT, ALPHABET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn embedded_constants_are_intact() {
        assert_eq!(SALT.chars().count(), 15);
        assert_eq!(ALPHABET.chars().count(), 255);
    }

    #[test]
    fn golden_vectors_with_embedded_constants() {
        assert_eq!(encode_password("admin"), "WaQ7xbhc9TefbwK");
        assert_eq!(encode_password("password"), "xHVQ3wiB9TefbwK");
        assert_eq!(encode_password(""), "tyWcQbhc9TefbwK");
    }

    #[test]
    fn password_longer_than_salt_pads_salt_side() {
        let encoded = encode_password("correct-horse-battery-staple");
        assert_eq!(encoded, "i4wRU03r1HyDVDM477UYaM974WoU");
        assert_eq!(encoded.chars().count(), 28);
    }

    #[test]
    fn custom_constants_follow_the_xor_rule() {
        // 'a'^'x' = 25, 'b'^'y' = 27, 187^'z' = 193
        assert_eq!(encode("ab", "xyz", "0123456789"), "573");
        // 'c'^187 = 216, 216 % 7 = 6
        assert_eq!(encode("abcd", "xy", "ABCDEFG"), "EGGG");
    }

    #[test]
    fn length_is_max_of_inputs() {
        for (password, salt) in [("", ""), ("a", ""), ("", "abc"), ("hello", "hi"), ("é", "xy")] {
            let expected = password.chars().count().max(salt.chars().count());
            assert_eq!(encode(password, salt, "xyz").chars().count(), expected);
        }
    }

    #[test]
    fn counts_code_points_not_bytes() {
        assert_eq!(encode_password("é"), "ZyWcQbhc9TefbwK");
    }

    #[test]
    fn is_deterministic() {
        assert_eq!(encode_password("s3cret!"), encode_password("s3cret!"));
    }

    #[test]
    fn empty_alphabet_yields_empty_output() {
        assert_eq!(encode("admin", SALT, ""), "");
    }
}
