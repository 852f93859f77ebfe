//! Ticket-number formatting and ordering rules.
//!
//! Ticket numbers are stored as strings, zero-padded to the width of the
//! largest number in the pool ("000".."999" for a pool of 1000), and sorted
//! by numeric value rather than lexicographically.

/// Character width of the largest ticket number in a pool of `total` tickets.
pub fn pad_width(total: u32) -> usize {
    total.saturating_sub(1).to_string().len()
}

/// Generate the full ticket pool for a lottery: `0..total`, zero-padded.
pub fn generate_pool(total: u32) -> Vec<String> {
    let width = pad_width(total);
    (0..total).map(|n| format!("{n:0width$}")).collect()
}

/// Sort ticket numbers ascending by numeric value ("002" before "010").
/// Non-numeric entries sort last, preserving their relative order.
pub fn sort_numeric(tickets: &mut [String]) {
    tickets.sort_by_key(|t| t.parse::<i64>().unwrap_or(i64::MAX));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_width_follows_largest_number() {
        assert_eq!(pad_width(10), 1);
        assert_eq!(pad_width(100), 2);
        assert_eq!(pad_width(1000), 3);
        assert_eq!(pad_width(1001), 4);
    }

    #[test]
    fn generate_pool_pads_to_width() {
        let pool = generate_pool(1000);
        assert_eq!(pool.len(), 1000);
        assert_eq!(pool.first().unwrap(), "000");
        assert_eq!(pool.last().unwrap(), "999");
        assert!(pool.iter().all(|t| t.len() == 3));
    }

    #[test]
    fn generate_pool_single_digit() {
        assert_eq!(generate_pool(3), vec!["0", "1", "2"]);
    }

    #[test]
    fn sort_is_numeric_not_lexicographic() {
        let mut tickets = vec!["010".to_string(), "002".to_string(), "100".to_string()];
        sort_numeric(&mut tickets);
        assert_eq!(tickets, vec!["002", "010", "100"]);
    }
}
