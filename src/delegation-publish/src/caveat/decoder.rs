//! Decoding of packed caveat terms, the inverse of the builders' encodings.

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    caveat::{ExactExecutionTerms, TransferBatchTerms, TRANSFER_BATCH_HEAD_LEN},
    errors::CaveatError,
};

pub fn decode_exact_execution_terms(terms: &[u8]) -> ExactExecutionTerms {
    ExactExecutionTerms::new(Bytes::copy_from_slice(terms))
}

pub fn decode_transfer_batch_terms(terms: &[u8]) -> Result<TransferBatchTerms, CaveatError> {
    if terms.len() < TRANSFER_BATCH_HEAD_LEN {
        return Err(CaveatError::Truncated);
    }
    let mut i = 0usize;
    let token = read_address(terms, &mut i)?;
    let recipient = read_address(terms, &mut i)?;
    let amount = read_u256(terms, &mut i)?;
    let first_target = read_address(terms, &mut i)?;
    let first_calldata = Bytes::copy_from_slice(&terms[i..]);

    Ok(TransferBatchTerms {
        token,
        recipient,
        amount,
        first_target,
        first_calldata,
    })
}

fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, CaveatError> {
    if bytes.len() < *i + 20 {
        return Err(CaveatError::Truncated);
    }
    let addr = Address::from_slice(&bytes[*i..*i + 20]);
    *i += 20;
    Ok(addr)
}

fn read_u256(bytes: &[u8], i: &mut usize) -> Result<U256, CaveatError> {
    if bytes.len() < *i + 32 {
        return Err(CaveatError::Truncated);
    }
    let word = &bytes[*i..*i + 32];
    *i += 32;
    Ok(U256::from_be_slice(word))
}
