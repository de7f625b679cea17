// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Course registration contract interface.

use alloy::{primitives::U256, sol};

use super::LedgerError;

// Define the registration contract interface using alloy's sol! macro
sol! {
    #[sol(rpc)]
    interface ICourseRegistration {
        function getPendingCourses(address student) external view returns (uint256[]);
        function getApprovedCourses(address student) external view returns (uint256[]);
        function isAdmin(address account) external view returns (bool);
        function approveCourse(address student, uint256 courseId) external;
        function setCourseCapacity(uint256 courseId, uint256 capacity) external;
        function addAdmin(address account) external;
        function removeAdmin(address account) external;
        function addCourse(uint256 courseId) external;
        function removeCourse(uint256 courseId) external;
    }
}

/// Narrow an on-chain course id to the store's key type.
pub fn narrow_course_id(id: U256) -> Result<u64, LedgerError> {
    u64::try_from(id).map_err(|_| LedgerError::InvalidCourseId(id.to_string()))
}

/// Narrow a list of on-chain course ids, failing on the first out-of-range id.
pub fn narrow_course_ids(ids: Vec<U256>) -> Result<Vec<u64>, LedgerError> {
    ids.into_iter().map(narrow_course_id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrows_ids_in_range() {
        let ids = vec![U256::from(7u64), U256::from(u64::MAX)];
        assert_eq!(narrow_course_ids(ids).unwrap(), vec![7, u64::MAX]);
    }

    #[test]
    fn rejects_ids_wider_than_u64() {
        let too_big = U256::from(u64::MAX) + U256::from(1u64);
        let err = narrow_course_ids(vec![U256::from(1u64), too_big]).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidCourseId(_)));
    }
}
