pub fn u8s_from_str(input: &str) -> [u8; 32] {
    blake3::hash(input.as_bytes()).into()
}

pub fn u64_from_str(input: &str) -> u64 {
    let u8s = u8s_from_str(input);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&u8s[0..8]);
    u64::from_le_bytes(bytes)
}

/// Derives the 32 byte instance seed from a free-form seed string and a nonce.
pub fn calc_seed(seed: &str, nonce: u64) -> [u8; 32] {
    u8s_from_str(&format!("{}_{}", seed, nonce))
}
