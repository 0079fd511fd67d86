use super::fruit_tree;
use crate::{Keccak256, MultiProof, process_multi_proof, process_proof, to_hex};

#[test]
fn test_single_proof_report_uses_sorted_index() {
    let tree = fruit_tree();
    let report = tree.single_proof_report(4).expect("report");
    assert_eq!(report.root, tree.root());
    assert_eq!(report.leaves, tree.sorted_leaves());
    // Kiwi has the smallest leaf hash
    assert_eq!(report.index_to_prove, 0);
    let leaf = report.leaves[report.index_to_prove];
    assert_eq!(process_proof::<Keccak256>(&leaf, &report.proof), report.root);
}

#[test]
fn test_multi_proof_report_replays() {
    let tree = fruit_tree();
    let report = tree.multi_proof_report(&[6, 5, 4, 0]).expect("report");
    // tree indices 8, 9, 12, 11 → sorted positions 4, 3, 0, 1
    assert_eq!(report.indices, vec![0, 1, 3, 4]);

    // ascending sorted indices line up with the descending tree-index leaves
    let multiproof = MultiProof {
        leaves: report.indices.iter().map(|&i| report.leaves[i]).collect(),
        proof: report.proof.clone(),
        proof_flags: report.proof_flags.clone(),
    };
    assert_eq!(
        process_multi_proof::<Keccak256>(&multiproof).expect("process"),
        report.root
    );
}

#[test]
fn test_report_json() {
    let tree = fruit_tree();
    let json = serde_json::to_value(tree.single_proof_report(2).expect("report")).expect("json");
    assert_eq!(json["root"], to_hex(&tree.root()));
    assert_eq!(json["leaves"].as_array().expect("leaves").len(), 7);
    assert!(json["indexToProve"].is_u64());

    let json =
        serde_json::to_value(tree.multi_proof_report(&[1, 2]).expect("report")).expect("json");
    assert!(json["proofFlags"].is_array());
}
