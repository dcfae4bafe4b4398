//! Text rendering of synchronizer snapshots.

use std::fmt::Write as _;

use txscope_primitives::{Address, Transaction, U256};
use txscope_sync::{SyncSnapshot, SyncState};

/// Wei per hundredth of an ether.
const WEI_PER_CENTI_ETHER: u64 = 10_000_000_000_000_000;

/// Message shown when the synchronizer failed.
pub(crate) const FAILURE_MESSAGE: &str = "A problem occurred while fetching transactions.";

const HASH_WIDTH: usize = 13;
const ADDRESS_WIDTH: usize = 13;
const VALUE_WIDTH: usize = 14;

/// Renders the whole screen for `snapshot`.
pub(crate) fn render(snapshot: &SyncSnapshot) -> String {
    let mut out = String::new();

    match snapshot.window {
        Some(window) => {
            let _ = writeln!(
                out,
                "Transactions from block {} - latest({})",
                window.start(),
                window.end()
            );
        }
        None => out.push_str("Waiting for the chain head...\n"),
    }

    if !snapshot.transactions.is_empty() {
        let _ = writeln!(
            out,
            "{:<HASH_WIDTH$}  {:<w$}  {:>VALUE_WIDTH$}",
            "Transaction Hash",
            "From / To",
            "Value in Eth",
            w = ADDRESS_WIDTH * 2 + 4,
        );
        for tx in &snapshot.transactions {
            out.push_str(&row(tx));
            out.push('\n');
        }
    } else if snapshot.window.is_some() {
        out.push_str("No value transfers in this window.\n");
    }

    match snapshot.state {
        SyncState::Syncing => out.push_str("Fetching transactions...\n"),
        SyncState::Failed => {
            let _ = writeln!(out, "\n{FAILURE_MESSAGE}");
            if let Some(error) = &snapshot.last_error {
                let _ = writeln!(out, "  {error}");
            }
            out.push_str("  Type `retry` to try again.\n");
        }
        SyncState::Idle => out.push_str("Type `more` to load older blocks, `help` for commands.\n"),
        SyncState::Stopped => out.push_str("Stopped.\n"),
        SyncState::Uninitialized => {}
    }
    out
}

fn row(tx: &Transaction) -> String {
    let to = tx.to.as_ref().map_or_else(|| "-".to_string(), short_address);
    format!(
        "{:<HASH_WIDTH$}  from {:<ADDRESS_WIDTH$} to {:<ADDRESS_WIDTH$}  {:>VALUE_WIDTH$}",
        shorten(&tx.hash.to_string()),
        short_address(&tx.from),
        to,
        format!("$ {}", format_ether(tx.value)),
    )
}

fn short_address(address: &Address) -> String {
    shorten(&address.to_string())
}

/// Shortens a `0x` hex string to `0x1234…cdef`.
pub(crate) fn shorten(hex: &str) -> String {
    let digits = hex.strip_prefix("0x").unwrap_or(hex);
    if digits.len() <= 8 || !digits.is_ascii() {
        return hex.to_string();
    }
    format!("0x{}…{}", &digits[..4], &digits[digits.len() - 4..])
}

/// Formats a wei amount as ether with two decimals, rounding half up.
pub(crate) fn format_ether(wei: U256) -> String {
    let unit = U256::from(WEI_PER_CENTI_ETHER);
    let cents = wei.saturating_add(unit / U256::from(2)) / unit;
    let hundred = U256::from(100);
    let fraction = (cents % hundred).to::<u64>();
    format!("{}.{fraction:02}", cents / hundred)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use txscope_primitives::B256;
    use txscope_window::Window;

    use super::*;

    const ETHER: u64 = 1_000_000_000_000_000_000;

    fn transfer(value: U256) -> Transaction {
        Transaction {
            hash: B256::repeat_byte(0xab),
            block_number: 101,
            index: 0,
            from: Address::repeat_byte(0x12),
            to: Some(Address::repeat_byte(0x34)),
            value,
        }
    }

    #[rstest]
    #[case::zero(U256::ZERO, "0.00")]
    #[case::one(U256::from(ETHER), "1.00")]
    #[case::rounds_down(U256::from(1_234_000_000_000_000_000_u64), "1.23")]
    #[case::rounds_half_up(U256::from(1_235_000_000_000_000_000_u64), "1.24")]
    #[case::dust(U256::from(4_999_999_999_999_999_u64), "0.00")]
    #[case::carries(U256::from(9_995_000_000_000_000_000_u64), "10.00")]
    #[case::huge(U256::MAX, "115792089237316195423570985008687907853269984665640564039457.58")]
    fn formats_ether(#[case] wei: U256, #[case] expected: &str) {
        assert_eq!(format_ether(wei), expected);
    }

    #[rstest]
    #[case::hash(
        "0xabababababababababababababababababababababababababababababababab",
        "0xabab…abab"
    )]
    #[case::address("0x1234567890abcdef1234567890abcdef12345678", "0x1234…5678")]
    #[case::short("0x1234", "0x1234")]
    fn shortens(#[case] hex: &str, #[case] expected: &str) {
        assert_eq!(shorten(hex), expected);
    }

    #[test]
    fn renders_header_and_rows() {
        let snapshot = SyncSnapshot {
            state: SyncState::Idle,
            window: Some(Window::new(100, 101).unwrap()),
            transactions: vec![transfer(U256::from(ETHER))],
            last_error: None,
        };

        let screen = render(&snapshot);

        assert!(screen.starts_with("Transactions from block 100 - latest(101)\n"));
        assert!(screen.contains("0xabab…abab"));
        assert!(screen.contains("$ 1.00"));
    }

    #[test]
    fn renders_failure_card() {
        let snapshot = SyncSnapshot {
            state: SyncState::Failed,
            window: Some(Window::single(100)),
            transactions: Vec::new(),
            last_error: Some("failed to fetch block 99".to_string()),
        };

        let screen = render(&snapshot);

        assert!(screen.contains(FAILURE_MESSAGE));
        assert!(screen.contains("failed to fetch block 99"));
        assert!(screen.contains("retry"));
    }

    #[test]
    fn renders_loading_before_first_window() {
        let snapshot = SyncSnapshot { state: SyncState::Syncing, ..Default::default() };

        let screen = render(&snapshot);

        assert!(screen.contains("Waiting for the chain head"));
        assert!(screen.contains("Fetching transactions"));
    }
}
