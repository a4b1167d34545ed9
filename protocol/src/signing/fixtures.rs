//! Skeleton builders shared by the signing tests.

use crate::config::{SECP256K1_BLAKE160_CODE_HASH, SIGNATURE_LENGTH};
use crate::signing::ScriptTemplate;
use crate::transaction::types::{
    CellDep, CellOutput, DepType, HashType, OutPoint, OutputCell, ResolvedInput, Script,
    TransactionSkeleton,
};
use crate::transaction::witness::WitnessArgs;

pub fn template() -> ScriptTemplate {
    ScriptTemplate {
        code_hash: SECP256K1_BLAKE160_CODE_HASH,
        hash_type: HashType::Type,
        args_len: Some(20),
    }
}

pub fn secp_lock(args_byte: u8) -> Script {
    Script {
        code_hash: SECP256K1_BLAKE160_CODE_HASH,
        hash_type: HashType::Type,
        args: vec![args_byte; 20],
    }
}

pub fn other_lock(args_byte: u8) -> Script {
    Script {
        code_hash: [0x5c; 32],
        hash_type: HashType::Data1,
        args: vec![args_byte; 32],
    }
}

pub fn input(lock: Script, n: u8) -> ResolvedInput {
    ResolvedInput {
        out_point: OutPoint {
            tx_hash: [n; 32],
            index: u32::from(n),
        },
        since: 0,
        cell_output: CellOutput {
            capacity: 100_0000_0000,
            lock,
            type_: None,
        },
        data: vec![],
    }
}

pub fn placeholder() -> Vec<u8> {
    WitnessArgs::placeholder(SIGNATURE_LENGTH).to_bytes().unwrap()
}

pub fn skeleton(locks: Vec<Script>, witnesses: Vec<Vec<u8>>) -> TransactionSkeleton {
    TransactionSkeleton {
        version: 0,
        cell_deps: vec![CellDep {
            out_point: OutPoint {
                tx_hash: [0xf8; 32],
                index: 0,
            },
            dep_type: DepType::DepGroup,
        }],
        header_deps: vec![],
        inputs: locks
            .into_iter()
            .enumerate()
            .map(|(n, lock)| input(lock, n as u8 + 1))
            .collect(),
        outputs: vec![OutputCell {
            cell_output: CellOutput {
                capacity: 61_0000_0000,
                lock: secp_lock(0xee),
                type_: None,
            },
            data: vec![],
        }],
        witnesses,
    }
}
