//! Generated keys for append-only lists.
//!
//! A key is 20 characters: 8 encode the creation time in milliseconds and 12
//! are random. Keys created later sort after keys created earlier, and keys
//! created within the same millisecond by one generator still sort in order.

use rand::Rng;

/// Ordered alphabet, each character's position matches its ASCII ordering.
const PUSH_CHARS: &[u8; 64] = b"-0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ_abcdefghijklmnopqrstuvwxyz";

const TIME_CHARS: usize = 8;
const RANDOM_CHARS: usize = 12;

#[derive(Debug, Default)]
pub struct PushIdGenerator {
    last_time: i64,
    last_random: [u8; RANDOM_CHARS],
}

impl PushIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        self.next_id_at(now, &mut rand::thread_rng())
    }

    /// Builds a key for the given clock reading. A clock that goes backwards
    /// is treated as a repeat of the last reading.
    pub fn next_id_at(&mut self, now_ms: i64, rng: &mut impl Rng) -> String {
        let repeated = now_ms <= self.last_time;
        if !repeated {
            self.last_time = now_ms;
            for digit in self.last_random.iter_mut() {
                *digit = rng.gen_range(0..64);
            }
        } else {
            for digit in self.last_random.iter_mut().rev() {
                if *digit == 63 {
                    *digit = 0;
                } else {
                    *digit += 1;
                    break;
                }
            }
        }

        let mut id = [0u8; TIME_CHARS + RANDOM_CHARS];
        let mut time = self.last_time.max(0);
        for slot in id[..TIME_CHARS].iter_mut().rev() {
            *slot = PUSH_CHARS[(time % 64) as usize];
            time /= 64;
        }
        for (slot, digit) in id[TIME_CHARS..].iter_mut().zip(self.last_random) {
            *slot = PUSH_CHARS[digit as usize];
        }
        id.iter().map(|&byte| byte as char).collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn keys_are_twenty_characters_from_the_alphabet() {
        let id = PushIdGenerator::new().next_id();
        assert_eq!(id.len(), 20);
        assert!(id.bytes().all(|byte| PUSH_CHARS.contains(&byte)));
    }

    #[test]
    fn later_keys_sort_after_earlier_ones() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut generator = PushIdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_000, &mut rng);
        let second = generator.next_id_at(1_700_000_000_001, &mut rng);
        assert!(first < second);
    }

    #[test]
    fn same_millisecond_keys_are_distinct_and_ordered() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut generator = PushIdGenerator::new();
        let ids: Vec<String> = (0..100)
            .map(|_| generator.next_id_at(1_700_000_000_000, &mut rng))
            .collect();
        let mut sorted = ids.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, ids);
    }

    #[test]
    fn clock_going_backwards_keeps_order() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut generator = PushIdGenerator::new();
        let first = generator.next_id_at(1_700_000_000_500, &mut rng);
        let second = generator.next_id_at(1_700_000_000_000, &mut rng);
        assert!(first < second);
    }
}
