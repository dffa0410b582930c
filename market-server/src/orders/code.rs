//! Human-readable order codes
//!
//! `FO` + base36(millis) + 5 random base36 characters, uppercased.

use rand::Rng;
use shared::util::to_base36;

use crate::orders::traits::{CommandContext, OrderError};

pub const ORDER_CODE_PREFIX: &str = "FO";

const RANDOM_SUFFIX_LEN: usize = 5;

/// Attempts before giving up on a unique code
const MAX_CODE_ATTEMPTS: usize = 8;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// One candidate code for a timestamp
pub fn candidate_code<R: Rng + ?Sized>(now_millis: i64, rng: &mut R) -> String {
    let mut code = String::with_capacity(16);
    code.push_str(ORDER_CODE_PREFIX);
    code.push_str(&to_base36(now_millis.max(0) as u64).to_uppercase());
    for _ in 0..RANDOM_SUFFIX_LEN {
        code.push(ALPHABET[rng.gen_range(0..ALPHABET.len())] as char);
    }
    code
}

/// Draw codes until one is not yet indexed
pub fn allocate_order_code(ctx: &CommandContext<'_>) -> Result<String, OrderError> {
    let mut rng = rand::thread_rng();
    for _ in 0..MAX_CODE_ATTEMPTS {
        let code = candidate_code(ctx.now(), &mut rng);
        if !ctx.order_code_exists(&code)? {
            return Ok(code);
        }
        tracing::debug!(code = %code, "Order code collision, retrying");
    }
    Err(OrderError::OrderCodeExhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        let mut rng = rand::thread_rng();
        let code = candidate_code(1_700_000_000_000, &mut rng);
        assert!(code.starts_with("FOLOYW3V28"));
        assert_eq!(code.len(), 2 + 8 + RANDOM_SUFFIX_LEN);
        assert!(code.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }
}
