//! Voting and finalization rules for withdrawal requests.
//!
//! Nothing in here touches contract storage. Every transition takes the
//! current request plus the ledger figures it depends on and hands back the
//! next request value; the caller decides whether to persist it. A rejected
//! transition returns an error and leaves the input untouched.
//!
//! Voter eligibility (is this address a contributor?) is the caller's job.

use soroban_sdk::Address;

use crate::storage_types::{CrowdfundError, Request};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RequestState {
    Open,
    Finalized,
}

pub fn state_of(request: &Request) -> RequestState {
    if request.completed {
        RequestState::Finalized
    } else {
        RequestState::Open
    }
}

/// Strict majority with truncating division: 2 of 4 is not enough, 3 of 4 is.
pub fn ready_to_finalize(request: &Request, contributors_count: u32) -> bool {
    request.voters_count > contributors_count / 2
}

/// Records `voter`'s approval on an open request.
pub fn vote(
    request: &Request,
    voter: &Address,
    contributors_count: u32,
) -> Result<Request, CrowdfundError> {
    if state_of(request) == RequestState::Finalized {
        return Err(CrowdfundError::RequestCompleted);
    }
    if request.voters.contains_key(voter.clone()) {
        return Err(CrowdfundError::AlreadyVoted);
    }
    if request.voters_count >= contributors_count {
        return Err(CrowdfundError::QuorumSaturated);
    }

    let mut next = request.clone();
    next.voters.set(voter.clone(), true);
    next.voters_count = request
        .voters_count
        .checked_add(1)
        .ok_or(CrowdfundError::Overflow)?;
    Ok(next)
}

/// Closes an approved request. The caller must withdraw `request.value` from
/// the campaign ledger when this succeeds.
pub fn finalize(
    request: &Request,
    contributors_count: u32,
    campaign_balance: i128,
) -> Result<Request, CrowdfundError> {
    if state_of(request) == RequestState::Finalized {
        return Err(CrowdfundError::RequestCompleted);
    }
    if !ready_to_finalize(request, contributors_count) {
        return Err(CrowdfundError::QuorumNotReached);
    }
    // strictly less: a request can never drain the whole balance
    if request.value >= campaign_balance {
        return Err(CrowdfundError::InsufficientFunds);
    }

    let mut next = request.clone();
    next.completed = true;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Env, Map, String};

    fn open_request(env: &Env, value: i128) -> Request {
        Request {
            id: 0,
            description: String::from_str(env, "Buy printing supplies"),
            value,
            recipient: Address::generate(env),
            voters: Map::new(env),
            voters_count: 0,
            completed: false,
        }
    }

    fn with_votes(env: &Env, mut request: Request, votes: u32, contributors: u32) -> Request {
        for _ in 0..votes {
            request = vote(&request, &Address::generate(env), contributors).unwrap();
        }
        request
    }

    #[test]
    fn test_vote_adds_voter() {
        let env = Env::default();
        let request = open_request(&env, 30);
        let voter = Address::generate(&env);

        let next = vote(&request, &voter, 4).unwrap();

        assert_eq!(next.voters_count, 1);
        assert_eq!(next.voters.len(), 1);
        assert!(next.voters.contains_key(voter));
        // input is a snapshot, not mutated
        assert_eq!(request.voters_count, 0);
        assert_eq!(request.voters.len(), 0);
    }

    #[test]
    fn test_double_vote_rejected() {
        let env = Env::default();
        let voter = Address::generate(&env);
        let request = vote(&open_request(&env, 30), &voter, 4).unwrap();

        assert_eq!(vote(&request, &voter, 4), Err(CrowdfundError::AlreadyVoted));
        assert_eq!(request.voters_count, 1);
        assert_eq!(request.voters.len(), 1);
    }

    #[test]
    fn test_vote_saturated() {
        let env = Env::default();
        let request = with_votes(&env, open_request(&env, 30), 2, 2);

        assert_eq!(
            vote(&request, &Address::generate(&env), 2),
            Err(CrowdfundError::QuorumSaturated)
        );
        assert_eq!(
            vote(&open_request(&env, 30), &Address::generate(&env), 0),
            Err(CrowdfundError::QuorumSaturated)
        );
    }

    #[test]
    fn test_voters_count_tracks_voters() {
        let env = Env::default();
        let mut request = open_request(&env, 30);
        let voters = [
            Address::generate(&env),
            Address::generate(&env),
            Address::generate(&env),
        ];

        for voter in voters.iter() {
            request = vote(&request, voter, 5).unwrap();
            assert_eq!(request.voters_count, request.voters.len());
        }
        for voter in voters.iter() {
            assert!(vote(&request, voter, 5).is_err());
            assert_eq!(request.voters_count, request.voters.len());
        }
    }

    #[test]
    fn test_majority_threshold() {
        let env = Env::default();
        let base = open_request(&env, 30);

        // 4 contributors
        assert!(!ready_to_finalize(&with_votes(&env, base.clone(), 2, 4), 4));
        assert!(ready_to_finalize(&with_votes(&env, base.clone(), 3, 4), 4));

        // 5 contributors: 5 / 2 == 2, so three votes are needed
        assert!(!ready_to_finalize(&with_votes(&env, base.clone(), 2, 5), 5));
        assert!(ready_to_finalize(&with_votes(&env, base.clone(), 3, 5), 5));

        // 2 contributors, a single vote is a tie
        assert!(!ready_to_finalize(&with_votes(&env, base, 1, 2), 2));
    }

    #[test]
    fn test_majority_matches_doubling_rule() {
        let env = Env::default();
        for contributors in 1..=7u32 {
            for votes in 0..=contributors {
                let request = with_votes(&env, open_request(&env, 1), votes, contributors);
                assert_eq!(
                    ready_to_finalize(&request, contributors),
                    votes * 2 > contributors,
                    "{votes} of {contributors}"
                );
            }
        }
    }

    #[test]
    fn test_finalize_marks_completed() {
        let env = Env::default();
        let request = with_votes(&env, open_request(&env, 30), 3, 4);

        let next = finalize(&request, 4, 100).unwrap();

        assert!(next.completed);
        assert_eq!(state_of(&next), RequestState::Finalized);
        assert_eq!(state_of(&request), RequestState::Open);
    }

    #[test]
    fn test_finalize_twice() {
        let env = Env::default();
        let request = with_votes(&env, open_request(&env, 30), 3, 4);
        let done = finalize(&request, 4, 100).unwrap();

        assert_eq!(finalize(&done, 4, 70), Err(CrowdfundError::RequestCompleted));
    }

    #[test]
    fn test_finalize_without_quorum() {
        let env = Env::default();
        let request = with_votes(&env, open_request(&env, 30), 1, 2);

        assert_eq!(
            finalize(&request, 2, 100),
            Err(CrowdfundError::QuorumNotReached)
        );
    }

    #[test]
    fn test_finalize_needs_more_than_value() {
        let env = Env::default();
        let request = with_votes(&env, open_request(&env, 100), 3, 4);

        assert_eq!(
            finalize(&request, 4, 100),
            Err(CrowdfundError::InsufficientFunds)
        );
        assert_eq!(
            finalize(&request, 4, 50),
            Err(CrowdfundError::InsufficientFunds)
        );
        assert!(finalize(&request, 4, 101).is_ok());
    }

    #[test]
    fn test_vote_on_finalized() {
        let env = Env::default();
        let request = with_votes(&env, open_request(&env, 30), 3, 4);
        let done = finalize(&request, 4, 100).unwrap();

        assert_eq!(
            vote(&done, &Address::generate(&env), 4),
            Err(CrowdfundError::RequestCompleted)
        );
    }
}
