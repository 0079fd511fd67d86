mod test_hash;
mod test_report;

use crate::StandardMerkleTree;

/// Values from the differential-test demo, in input order.
pub(crate) const FRUITS: [&str; 7] = [
    "Pineapple",
    "Banana",
    "Orange",
    "Lemon",
    "Kiwi",
    "Apple",
    "Peach",
];

/// Keccak tree over [`FRUITS`] as UTF-8 bytes.
pub(crate) fn fruit_tree() -> StandardMerkleTree {
    init_tracing();
    StandardMerkleTree::of(&FRUITS).expect("fruit tree should build")
}

/// `n` distinct 4-byte values.
pub(crate) fn byte_values(n: usize) -> Vec<Vec<u8>> {
    (0..n).map(|i| (i as u32).to_be_bytes().to_vec()).collect()
}

/// Route `tracing` output to the test harness; safe to call repeatedly.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
