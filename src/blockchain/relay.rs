// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoding of client-signed enrollment transactions.
//!
//! Students sign `addCourse`/`removeCourse` calls in their own wallet and
//! hand the raw transaction to the backend, which checks it before
//! broadcasting.

use alloy::{
    consensus::{transaction::SignerRecoverable, Transaction, TxEnvelope},
    eips::eip2718::Decodable2718,
    primitives::Address,
    sol_types::SolCall,
};

use super::contract::{narrow_course_id, ICourseRegistration};
use super::{EnrollmentRequest, LedgerError, LedgerResult};
use crate::models::{EnrollmentAction, WalletAddress};

/// Decode a 0x-prefixed signed transaction into an enrollment request.
///
/// The transaction must be signed for `chain_id` and call `addCourse` or
/// `removeCourse` on `contract`.
pub fn decode_enrollment(
    signed_hex: &str,
    contract: Address,
    chain_id: u64,
) -> LedgerResult<EnrollmentRequest> {
    let trimmed = signed_hex.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let raw = alloy::hex::decode(digits)
        .map_err(|e| LedgerError::InvalidTransaction(format!("Invalid hex: {}", e)))?;

    let envelope = TxEnvelope::decode_2718(&mut raw.as_slice())
        .map_err(|e| LedgerError::InvalidTransaction(format!("Malformed transaction: {}", e)))?;

    match envelope.chain_id() {
        Some(id) if id == chain_id => {}
        Some(id) => {
            return Err(LedgerError::InvalidTransaction(format!(
                "Transaction is signed for chain {} instead of {}",
                id, chain_id
            )))
        }
        None => {
            return Err(LedgerError::InvalidTransaction(
                "Transaction is not bound to a chain id".to_string(),
            ))
        }
    }

    match envelope.to() {
        Some(to) if to == contract => {}
        Some(to) => {
            return Err(LedgerError::InvalidTransaction(format!(
                "Transaction targets {} instead of the registration contract",
                to
            )))
        }
        None => {
            return Err(LedgerError::InvalidTransaction(
                "Contract creation is not an enrollment".to_string(),
            ))
        }
    }

    let input = envelope.input();
    let add = ICourseRegistration::addCourseCall::abi_decode(input);
    let remove = ICourseRegistration::removeCourseCall::abi_decode(input);
    let (action, course_id) = if let Ok(call) = add {
        (EnrollmentAction::Add, call.courseId)
    } else if let Ok(call) = remove {
        (EnrollmentAction::Remove, call.courseId)
    } else {
        return Err(LedgerError::InvalidTransaction(
            "Only addCourse and removeCourse can be relayed".to_string(),
        ));
    };

    let course_id = narrow_course_id(course_id)
        .map_err(|e| LedgerError::InvalidTransaction(e.to_string()))?;

    let signer = envelope
        .recover_signer()
        .map_err(|e| LedgerError::InvalidTransaction(format!("Invalid signature: {}", e)))?;

    Ok(EnrollmentRequest {
        student: WalletAddress::from(signer.to_string()),
        action,
        course_id,
        raw,
    })
}
