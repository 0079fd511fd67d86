use hex_literal::hex;

use crate::{
    Keccak256, MerkleHasher, MerkleTreeError, hash_pair, leaf_hash,
    hash::{bytes_from_hex, hash_from_hex},
    to_hex,
};

#[test]
fn test_keccak256_known_vectors() {
    assert_eq!(
        Keccak256::hash(b""),
        hex!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
    );
    assert_eq!(
        Keccak256::hash(b"abc"),
        hex!("4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45")
    );
}

#[test]
fn test_leaf_hash_is_double_hash() {
    let inner = Keccak256::hash(b"Kiwi");
    assert_eq!(leaf_hash::<Keccak256>(b"Kiwi"), Keccak256::hash(&inner));
    assert_eq!(
        leaf_hash::<Keccak256>(b"Kiwi"),
        hex!("88af3f378f648e65e39971ff2a39a3593dcf471032f80e82428e7bc7a5dc638f")
    );
}

#[test]
fn test_hash_pair_is_commutative() {
    let a = leaf_hash::<Keccak256>(b"a");
    let b = leaf_hash::<Keccak256>(b"b");
    assert_eq!(hash_pair::<Keccak256>(&a, &b), hash_pair::<Keccak256>(&b, &a));

    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let mut concat = lo.to_vec();
    concat.extend_from_slice(&hi);
    assert_eq!(hash_pair::<Keccak256>(&a, &b), Keccak256::hash(&concat));
}

#[test]
fn test_leaf_and_node_domains_differ() {
    // a 64-byte value shaped like two children must not hash like their parent
    let a = [0x11u8; 32];
    let b = [0x22u8; 32];
    let mut value = a.to_vec();
    value.extend_from_slice(&b);
    assert_ne!(leaf_hash::<Keccak256>(&value), hash_pair::<Keccak256>(&a, &b));
}

#[cfg(feature = "blake3")]
#[test]
fn test_blake3_hasher() {
    use crate::Blake3;

    assert_eq!(Blake3::hash(b"abc"), *blake3::hash(b"abc").as_bytes());
    assert_ne!(leaf_hash::<Blake3>(b"abc"), leaf_hash::<Keccak256>(b"abc"));
}

#[test]
fn test_hex_helpers() {
    let hash = hex!("88af3f378f648e65e39971ff2a39a3593dcf471032f80e82428e7bc7a5dc638f");
    let text = to_hex(&hash);
    assert_eq!(
        text,
        "0x88af3f378f648e65e39971ff2a39a3593dcf471032f80e82428e7bc7a5dc638f"
    );
    assert_eq!(hash_from_hex(&text).expect("prefixed"), hash);
    assert_eq!(hash_from_hex(&text[2..]).expect("bare"), hash);
    assert_eq!(bytes_from_hex("0x").expect("empty"), Vec::<u8>::new());

    assert!(matches!(
        hash_from_hex("0x1234"),
        Err(MerkleTreeError::InvalidData(_))
    ));
    assert!(matches!(
        bytes_from_hex("0xzz"),
        Err(MerkleTreeError::InvalidData(_))
    ));
}
