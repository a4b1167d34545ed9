//! Terminal walkthrough of the signing pipeline.
//!
//! Builds a testnet skeleton where two owners share a transaction, prints
//! the signing entries, signs each group with its owner's key, seals the
//! witnesses and checks every signature by public key recovery.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use cellseal_protocol::config::NetworkConfig;
use cellseal_protocol::crypto::keys::{CkbKeypair, Signature};
use cellseal_protocol::crypto::lock_args_for;
use cellseal_protocol::signing::{generate_signing_entries, seal, sign_entries, PrivateKeySigner};
use cellseal_protocol::transaction::{
    CellDep, CellOutput, OutPoint, OutputCell, ResolvedInput, TransactionSkeleton, WitnessArgs,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";

fn step(n: u32, title: &str) {
    println!("\n{BOLD}{CYAN}[{n}]{RESET} {BOLD}{title}{RESET}");
}

fn short(bytes: &[u8]) -> String {
    let h = hex::encode(bytes);
    if h.len() > 16 {
        format!("0x{}…{}", &h[..8], &h[h.len() - 8..])
    } else {
        format!("0x{h}")
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let network = NetworkConfig::aggron4();
    let secp = &network.secp256k1_blake160;

    step(1, "Keys");
    let alice = CkbKeypair::generate();
    let bob = CkbKeypair::generate();
    println!("  alice args {}", short(&alice.lock_args()));
    println!("  bob   args {}", short(&bob.lock_args()));

    step(2, "Skeleton");
    let owners = [&alice, &bob, &alice];
    let placeholder = WitnessArgs::placeholder(65).to_bytes()?;
    let skeleton = TransactionSkeleton {
        cell_deps: vec![CellDep {
            out_point: secp.dep_out_point(),
            dep_type: secp.dep_type,
        }],
        inputs: owners
            .iter()
            .enumerate()
            .map(|(i, kp)| ResolvedInput {
                out_point: OutPoint {
                    tx_hash: [i as u8 + 1; 32],
                    index: 0,
                },
                since: 0,
                cell_output: CellOutput {
                    capacity: 500_0000_0000,
                    lock: secp.lock_script(kp.lock_args().to_vec()),
                    type_: None,
                },
                data: vec![],
            })
            .collect(),
        outputs: vec![OutputCell {
            cell_output: CellOutput {
                capacity: 1499_0000_0000,
                lock: secp.lock_script(bob.lock_args().to_vec()),
                type_: None,
            },
            data: vec![],
        }],
        witnesses: vec![placeholder; owners.len()],
        ..TransactionSkeleton::default()
    };
    println!(
        "  {} inputs, {} witnesses, tx hash {}",
        skeleton.inputs.len(),
        skeleton.witnesses.len(),
        short(&skeleton.tx_hash()?)
    );

    step(3, "Signing entries");
    let started = Instant::now();
    let entries = generate_signing_entries(&skeleton, &secp.template())?;
    for entry in &entries {
        println!(
            "  input {} lock {} message {}",
            entry.index,
            short(&entry.script.args),
            short(&entry.message)
        );
    }
    println!("  {DIM}generated in {:?}{RESET}", started.elapsed());

    step(4, "Sign and seal");
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let mut signatures = Vec::with_capacity(entries.len());
    for entry in &entries {
        let owner = if entry.script.args == alice.lock_args() {
            &alice
        } else {
            &bob
        };
        let signer = PrivateKeySigner::new(owner.clone());
        signatures.extend(runtime.block_on(sign_entries(&signer, std::slice::from_ref(entry)))?);
    }
    let tx = seal(skeleton, &entries, &signatures)?;
    println!("  sealed {}", tx.hash_hex()?);

    step(5, "Verify by recovery");
    for entry in &entries {
        let args = WitnessArgs::from_bytes(&tx.witnesses[entry.index])?;
        let signature = Signature::from_bytes(args.lock.as_deref().unwrap_or_default())?;
        let recovered = signature.recover(&entry.message)?;
        let ok = lock_args_for(&recovered).as_slice() == entry.script.args.as_slice();
        println!(
            "  input {} {}{}{}",
            entry.index,
            GREEN,
            if ok { "recovers to lock args" } else { "MISMATCH" },
            RESET
        );
    }

    Ok(())
}
