//! End-to-end tests for the signing pipeline.
//!
//! These run the whole path a wallet takes: a skeleton arrives as JSON, the
//! entries are generated, signed and sealed, and the sealed witnesses are
//! checked the way the on-chain lock checks them, by recovering the public
//! key from each signature and comparing its blake160 with the lock args.

use std::sync::Arc;

use cellseal_protocol::config::NetworkConfig;
use cellseal_protocol::crypto::keys::{CkbKeypair, Signature};
use cellseal_protocol::crypto::{ckb_hash, lock_args_for};
use cellseal_protocol::signing::{
    generate_signing_entries, seal, sign_entries, PrivateKeySigner,
    Secp256k1Blake160SignableScript, SigningError,
};
use cellseal_protocol::transaction::{
    CellDep, CellOutput, OutPoint, OutputCell, ResolvedInput, Script, TransactionSkeleton,
    WitnessArgs,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const ALICE_PRIVATE_KEY: &str =
    "0x888e22145fdc41297ab7d804771cd042e5bcb6ed7ae7d36428e72c6df389ae37";
const ALICE_ARGS: &str = "f1251ee1c665f8771834983dcdb355d9ce1afd51";
const BOB_ARGS: &str = "521571da5d51794e3c7ed1d092eef6c652584a5a";

fn network() -> NetworkConfig {
    NetworkConfig::aggron4()
}

fn lock_of(kp: &CkbKeypair) -> Script {
    network()
        .secp256k1_blake160
        .lock_script(kp.lock_args().to_vec())
}

fn resolved(lock: Script, n: u8, capacity: u64) -> ResolvedInput {
    ResolvedInput {
        out_point: OutPoint {
            tx_hash: [n; 32],
            index: 0,
        },
        since: 0,
        cell_output: CellOutput {
            capacity,
            lock,
            type_: None,
        },
        data: vec![],
    }
}

/// A skeleton spending `locks` in order, with a placeholder witness for every
/// input and one extra witness at the end.
fn skeleton_for(locks: Vec<Script>) -> TransactionSkeleton {
    let placeholder = WitnessArgs::placeholder(65).to_bytes().unwrap();
    let mut witnesses = vec![placeholder; locks.len()];
    witnesses.push(vec![0xde, 0xad]);

    let secp = network().secp256k1_blake160;
    TransactionSkeleton {
        version: 0,
        cell_deps: vec![CellDep {
            out_point: secp.dep_out_point(),
            dep_type: secp.dep_type,
        }],
        header_deps: vec![],
        inputs: locks
            .into_iter()
            .enumerate()
            .map(|(n, lock)| resolved(lock, n as u8 + 1, 200_0000_0000))
            .collect(),
        outputs: vec![OutputCell {
            cell_output: CellOutput {
                capacity: 150_0000_0000,
                lock: secp.lock_script(vec![0x11; 20]),
                type_: None,
            },
            data: vec![],
        }],
        witnesses,
    }
}

fn signature_in(witness: &[u8]) -> Signature {
    let args = WitnessArgs::from_bytes(witness).expect("witness args");
    Signature::from_bytes(&args.lock.expect("lock field")).expect("65-byte signature")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn two_owners_sign_their_own_groups() {
    let alice = CkbKeypair::generate();
    let bob = CkbKeypair::generate();
    let skeleton = skeleton_for(vec![lock_of(&alice), lock_of(&bob), lock_of(&alice)]);
    let template = network().secp256k1_blake160.template();

    let entries = generate_signing_entries(&skeleton, &template).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].index, 0);
    assert_eq!(entries[1].index, 1);

    // Each owner signs only their own entry.
    let alice_sig = sign_entries(&PrivateKeySigner::new(alice.clone()), &entries[..1])
        .await
        .unwrap();
    let bob_sig = sign_entries(&PrivateKeySigner::new(bob.clone()), &entries[1..])
        .await
        .unwrap();
    let signatures = [alice_sig, bob_sig].concat();

    let tx = seal(skeleton.clone(), &entries, &signatures).unwrap();

    assert_eq!(tx.hash().unwrap(), skeleton.tx_hash().unwrap());
    for (entry, owner) in entries.iter().zip([&alice, &bob]) {
        let sig = signature_in(&tx.witnesses[entry.index]);
        let recovered = sig.recover(&entry.message).unwrap();
        assert_eq!(lock_args_for(&recovered), owner.lock_args());
        assert_eq!(entry.script.args, owner.lock_args().to_vec());
    }
    // Non-representative and extra witnesses are left as they were.
    assert_eq!(tx.witnesses[2], skeleton.witnesses[2]);
    assert_eq!(tx.witnesses[3], skeleton.witnesses[3]);
}

#[tokio::test]
async fn signable_script_round_trip() {
    let kp = CkbKeypair::generate();
    let skeleton = skeleton_for(vec![lock_of(&kp), lock_of(&kp)]);
    let script = Secp256k1Blake160SignableScript::new(
        network().secp256k1_blake160.template(),
        Arc::new(PrivateKeySigner::new(kp.clone())),
    );

    let message = script.generate_signing_entries(&skeleton).unwrap()[0].message;
    let tx = script.sign_skeleton(skeleton).await.unwrap();

    let recovered = signature_in(&tx.witnesses[0]).recover(&message).unwrap();
    assert_eq!(recovered, kp.public_key());
}

#[test]
fn message_matches_hand_computed_digest() {
    let kp = CkbKeypair::generate();
    let skeleton = skeleton_for(vec![lock_of(&kp)]);
    let template = network().secp256k1_blake160.template();

    let entries = generate_signing_entries(&skeleton, &template).unwrap();

    let mut preimage = skeleton.tx_hash().unwrap().to_vec();
    for witness in &skeleton.witnesses {
        preimage.extend_from_slice(&(witness.len() as u64).to_le_bytes());
        preimage.extend_from_slice(witness);
    }
    assert_eq!(entries[0].message, ckb_hash(&preimage));
}

#[test]
fn skeleton_from_json() {
    let kp = CkbKeypair::generate();
    let args = hex::encode_upper(kp.lock_args());
    let json = format!(
        r#"{{
            "version": "0x0",
            "cell_deps": [{{
                "out_point": {{
                    "tx_hash": "0xF8DE3BB47D055CDF460D93A2A6E1B05F7432F9777C8C474ABF4EEC1D4AEE5D37",
                    "index": "0x0"
                }},
                "dep_type": "dep_group"
            }}],
            "inputs": [{{
                "out_point": {{ "tx_hash": "0x{tx}", "index": "0x1" }},
                "cell_output": {{
                    "capacity": "0x2540be400",
                    "lock": {{
                        "code_hash": "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8",
                        "hash_type": "type",
                        "args": "0x{args}"
                    }}
                }}
            }}],
            "outputs": [],
            "witnesses": ["0x5500000010000000550000005500000041000000{zeros}"]
        }}"#,
        tx = "ab".repeat(32),
        args = args,
        zeros = "00".repeat(65),
    );

    let skeleton: TransactionSkeleton = serde_json::from_str(&json).unwrap();

    assert_eq!(skeleton.inputs[0].since, 0);
    assert_eq!(skeleton.inputs[0].cell_output.capacity, 100_0000_0000);
    assert_eq!(skeleton.inputs[0].lock(), &lock_of(&kp));
    assert_eq!(
        skeleton.witnesses[0],
        WitnessArgs::placeholder(65).to_bytes().unwrap()
    );

    let entries =
        generate_signing_entries(&skeleton, &network().secp256k1_blake160.template()).unwrap();
    assert_eq!(entries.len(), 1);
}

#[test]
fn missing_witness_stops_the_pipeline() {
    let kp = CkbKeypair::generate();
    let mut skeleton = skeleton_for(vec![lock_of(&kp)]);
    skeleton.witnesses.clear();

    let err =
        generate_signing_entries(&skeleton, &network().secp256k1_blake160.template()).unwrap_err();
    assert!(matches!(err, SigningError::MissingWitness { index: 0, witnesses: 0 }));
}

#[test]
fn mainnet_and_testnet_share_the_lock_code() {
    let mainnet = NetworkConfig::lina().secp256k1_blake160;
    let testnet = NetworkConfig::aggron4().secp256k1_blake160;
    assert_eq!(mainnet.template(), testnet.template());
    assert_ne!(mainnet.tx_hash, testnet.tx_hash);
}

#[tokio::test]
async fn fixed_transaction_has_known_hash_and_message() {
    // Alice spends two cells to pay Bob 100 CKB, keeping 50 CKB as change.
    let secp = network().secp256k1_blake160;
    let alice = secp.lock_script(hex::decode(ALICE_ARGS).unwrap());
    let bob = secp.lock_script(hex::decode(BOB_ARGS).unwrap());
    let spend = |n: u8, index: u32| ResolvedInput {
        out_point: OutPoint {
            tx_hash: [n; 32],
            index,
        },
        ..resolved(alice.clone(), n, 100_0000_0000)
    };
    let skeleton = TransactionSkeleton {
        cell_deps: vec![CellDep {
            out_point: secp.dep_out_point(),
            dep_type: secp.dep_type,
        }],
        inputs: vec![spend(0x11, 0), spend(0x22, 1)],
        outputs: vec![
            OutputCell {
                cell_output: CellOutput {
                    capacity: 100_0000_0000,
                    lock: bob,
                    type_: None,
                },
                data: vec![],
            },
            OutputCell {
                cell_output: CellOutput {
                    capacity: 50_0000_0000,
                    lock: alice.clone(),
                    type_: None,
                },
                data: vec![],
            },
        ],
        witnesses: vec![WitnessArgs::placeholder(65).to_bytes().unwrap(), vec![]],
        ..TransactionSkeleton::default()
    };

    assert_eq!(
        hex::encode(skeleton.tx_hash().unwrap()),
        "c3df6aab26f3b2ce33ae01dd464269c999f504b9480779f2eaace986c0fde060"
    );
    assert_eq!(
        hex::encode(alice.hash().unwrap()),
        "1969058211498afa996d7a7167f894b5114d573dba99593e1879bc0b9dda0346"
    );

    let entries = generate_signing_entries(&skeleton, &secp.template()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        hex::encode(entries[0].message),
        "7c08edbcc9056ef2379a5366bc0d0750299cc9c5af32449159256fd57e5ab854"
    );

    let signer = PrivateKeySigner::from_hex(ALICE_PRIVATE_KEY).unwrap();
    let signatures = sign_entries(&signer, &entries).await.unwrap();
    let tx = seal(skeleton, &entries, &signatures).unwrap();

    let recovered = signature_in(&tx.witnesses[0])
        .recover(&entries[0].message)
        .unwrap();
    assert_eq!(hex::encode(lock_args_for(&recovered)), ALICE_ARGS);
    assert_eq!(
        tx.hash_hex().unwrap(),
        "0xc3df6aab26f3b2ce33ae01dd464269c999f504b9480779f2eaace986c0fde060"
    );
}
