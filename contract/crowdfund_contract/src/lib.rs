#![no_std]


mod events;
mod ledger;
mod requests;
pub mod state_machine;
mod storage_types;

pub use ledger::CampaignLedger;
pub use requests::RequestStore;
pub use storage_types::{
    Campaign, CampaignId, CampaignSummary, CrowdfundError, DataKey, PersistentKey, Request,
    RequestId, TTL_INSTANCE, TTL_PERSISTENT,
};

use soroban_sdk::{contract, contractimpl, log, token, Address, Env, String, Vec};

#[contract]
pub struct CrowdfundContract;

#[contractimpl]
impl CrowdfundContract {
    /// Initialize the contract with the admin and the token campaigns raise.
    /// The admin is recorded as the deployer only; no entry point is gated
    /// on it, and the stored key doubles as the initialized marker.
    pub fn initialize(e: Env, admin: Address, token: Address) -> Result<(), CrowdfundError> {
        if e.storage().instance().has(&DataKey::Admin) {
            return Err(CrowdfundError::AlreadyInitialized);
        }
        admin.require_auth();

        e.storage().instance().set(&DataKey::Admin, &admin);
        e.storage().instance().set(&DataKey::Token, &token);
        e.storage().instance().set(&DataKey::NextCampaignId, &0u64);

        extend_instance(&e);
        Ok(())
    }

    /// Create a new campaign managed by `manager`
    pub fn create_campaign(
        e: Env,
        manager: Address,
        minimum_contribution: i128,
        target: i128,
        name: String,
        description: String,
        image_url: String,
        manager_name: String,
    ) -> Result<CampaignId, CrowdfundError> {
        manager.require_auth();
        token_address(&e)?;

        if minimum_contribution <= 0 || target <= 0 {
            return Err(CrowdfundError::InvalidAmount);
        }

        let campaign_id: CampaignId = e
            .storage()
            .instance()
            .get(&DataKey::NextCampaignId)
            .unwrap_or(0);
        let next_id = campaign_id
            .checked_add(1)
            .ok_or(CrowdfundError::Overflow)?;

        let campaign = Campaign {
            id: campaign_id,
            manager: manager.clone(),
            name: name.clone(),
            description,
            image_url,
            manager_name: manager_name.clone(),
            minimum_contribution,
            target,
            balance: 0,
            contributors_count: 0,
            total_contributed: 0,
            total_withdrawn: 0,
            created_at: e.ledger().timestamp(),
        };
        CampaignLedger::create(&e, campaign);

        e.storage().instance().set(&DataKey::NextCampaignId, &next_id);
        extend_instance(&e);

        events::emit_campaign_created(
            &e,
            events::CampaignCreatedEvent {
                campaign_id,
                manager,
                manager_name,
                name,
                minimum_contribution,
                target,
            },
        );

        Ok(campaign_id)
    }

    /// Contribute `amount` to a campaign. The first qualifying contribution
    /// earns the contributor a vote on every request of the campaign.
    pub fn contribute(
        e: Env,
        campaign_id: CampaignId,
        contributor: Address,
        amount: i128,
    ) -> Result<(), CrowdfundError> {
        contributor.require_auth();
        let token = token_address(&e)?;

        let mut ledger = CampaignLedger::load(&e, campaign_id)?;
        ledger.contribute(&contributor, amount).map_err(|err| {
            log!(&e, "contribution rejected", campaign_id, err as u32);
            err
        })?;

        token::Client::new(&e, &token).transfer(
            &contributor,
            &e.current_contract_address(),
            &amount,
        );

        events::emit_contribution(
            &e,
            events::ContributionEvent {
                campaign_id,
                contributor,
                amount,
                balance: ledger.balance(),
                contributors_count: ledger.contributors_count(),
            },
        );

        Ok(())
    }

    /// Propose a withdrawal of `value` to `recipient` (manager only)
    pub fn create_request(
        e: Env,
        campaign_id: CampaignId,
        manager: Address,
        description: String,
        recipient: Address,
        value: i128,
    ) -> Result<RequestId, CrowdfundError> {
        manager.require_auth();
        token_address(&e)?;

        let ledger = CampaignLedger::load(&e, campaign_id)?;
        require_manager(ledger.campaign(), &manager)?;

        if value <= 0 {
            return Err(CrowdfundError::InvalidAmount);
        }
        if value >= ledger.balance() {
            log!(&e, "request exceeds balance", campaign_id, value, ledger.balance());
            return Err(CrowdfundError::InsufficientFunds);
        }

        let request_id = RequestStore::new(&e, campaign_id).create_request(
            description,
            recipient.clone(),
            value,
        )?;

        events::emit_request_created(
            &e,
            events::RequestCreatedEvent {
                campaign_id,
                request_id,
                recipient,
                value,
            },
        );

        Ok(request_id)
    }

    /// Approve a request. Only contributors of the campaign may vote.
    pub fn vote_request(
        e: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
        voter: Address,
    ) -> Result<(), CrowdfundError> {
        voter.require_auth();
        token_address(&e)?;

        let ledger = CampaignLedger::load(&e, campaign_id)?;
        let store = RequestStore::new(&e, campaign_id);
        let request = store.get(request_id)?;

        if !ledger.is_contributor(&voter) {
            return Err(CrowdfundError::NotContributor);
        }

        let contributors_count = ledger.contributors_count();
        let next = state_machine::vote(&request, &voter, contributors_count).map_err(|err| {
            log!(&e, "vote rejected", campaign_id, request_id, err as u32);
            err
        })?;
        store.put(&next);

        events::emit_request_voted(
            &e,
            events::RequestVotedEvent {
                campaign_id,
                request_id,
                voter,
                voters_count: next.voters_count,
                ready_to_finalize: state_machine::ready_to_finalize(&next, contributors_count),
            },
        );

        Ok(())
    }

    /// Release an approved request's funds to its recipient (manager only)
    pub fn finalize_request(
        e: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
        manager: Address,
    ) -> Result<(), CrowdfundError> {
        manager.require_auth();
        let token = token_address(&e)?;

        let mut ledger = CampaignLedger::load(&e, campaign_id)?;
        require_manager(ledger.campaign(), &manager)?;

        let store = RequestStore::new(&e, campaign_id);
        let request = store.get(request_id)?;

        let next = state_machine::finalize(&request, ledger.contributors_count(), ledger.balance())
            .map_err(|err| {
                log!(&e, "finalize rejected", campaign_id, request_id, err as u32);
                err
            })?;
        ledger.record_withdrawal(next.value)?;
        store.put(&next);

        token::Client::new(&e, &token).transfer(
            &e.current_contract_address(),
            &next.recipient,
            &next.value,
        );

        log!(&e, "request finalized", campaign_id, request_id, next.value);
        events::emit_request_finalized(
            &e,
            events::RequestFinalizedEvent {
                campaign_id,
                request_id,
                recipient: next.recipient,
                value: next.value,
                balance: ledger.balance(),
            },
        );

        Ok(())
    }

    /// View functions
    pub fn get_deployed_campaigns(e: Env) -> Vec<CampaignId> {
        let next_id: CampaignId = e
            .storage()
            .instance()
            .get(&DataKey::NextCampaignId)
            .unwrap_or(0);

        let mut campaigns = Vec::new(&e);
        for id in 0..next_id {
            campaigns.push_back(id);
        }
        campaigns
    }

    pub fn get_campaign(e: Env, campaign_id: CampaignId) -> Result<Campaign, CrowdfundError> {
        Ok(CampaignLedger::load(&e, campaign_id)?.campaign().clone())
    }

    pub fn get_summary(e: Env, campaign_id: CampaignId) -> Result<CampaignSummary, CrowdfundError> {
        let campaign = CampaignLedger::load(&e, campaign_id)?.campaign().clone();
        let requests_count = RequestStore::new(&e, campaign_id).count();

        Ok(CampaignSummary {
            minimum_contribution: campaign.minimum_contribution,
            balance: campaign.balance,
            requests_count,
            contributors_count: campaign.contributors_count,
            manager: campaign.manager,
            name: campaign.name,
            description: campaign.description,
            image_url: campaign.image_url,
            manager_name: campaign.manager_name,
            target: campaign.target,
        })
    }

    pub fn get_balance(e: Env, campaign_id: CampaignId) -> Result<i128, CrowdfundError> {
        Ok(CampaignLedger::load(&e, campaign_id)?.balance())
    }

    pub fn contributors_count(e: Env, campaign_id: CampaignId) -> Result<u32, CrowdfundError> {
        Ok(CampaignLedger::load(&e, campaign_id)?.contributors_count())
    }

    pub fn is_contributor(
        e: Env,
        campaign_id: CampaignId,
        who: Address,
    ) -> Result<bool, CrowdfundError> {
        Ok(CampaignLedger::load(&e, campaign_id)?.is_contributor(&who))
    }

    pub fn get_contribution(
        e: Env,
        campaign_id: CampaignId,
        who: Address,
    ) -> Result<i128, CrowdfundError> {
        Ok(CampaignLedger::load(&e, campaign_id)?.contribution_of(&who))
    }

    pub fn requests_count(e: Env, campaign_id: CampaignId) -> Result<u32, CrowdfundError> {
        CampaignLedger::load(&e, campaign_id)?;
        Ok(RequestStore::new(&e, campaign_id).count())
    }

    pub fn get_request(
        e: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
    ) -> Result<Request, CrowdfundError> {
        CampaignLedger::load(&e, campaign_id)?;
        RequestStore::new(&e, campaign_id).get(request_id)
    }

    pub fn get_requests(e: Env, campaign_id: CampaignId) -> Result<Vec<Request>, CrowdfundError> {
        CampaignLedger::load(&e, campaign_id)?;
        Ok(RequestStore::new(&e, campaign_id).all())
    }

    pub fn ready_to_finalize(
        e: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
    ) -> Result<bool, CrowdfundError> {
        let ledger = CampaignLedger::load(&e, campaign_id)?;
        let request = RequestStore::new(&e, campaign_id).get(request_id)?;
        Ok(state_machine::ready_to_finalize(&request, ledger.contributors_count()))
    }

    pub fn has_voted(
        e: Env,
        campaign_id: CampaignId,
        request_id: RequestId,
        voter: Address,
    ) -> Result<bool, CrowdfundError> {
        CampaignLedger::load(&e, campaign_id)?;
        let request = RequestStore::new(&e, campaign_id).get(request_id)?;
        Ok(request.voters.contains_key(voter))
    }

    pub fn get_token(e: Env) -> Result<Address, CrowdfundError> {
        token_address(&e)
    }
}

// Helper functions
fn extend_instance(e: &Env) {
    e.storage().instance().extend_ttl(TTL_INSTANCE, TTL_INSTANCE);
}

pub(crate) fn extend_persistent(e: &Env, key: &PersistentKey) {
    e.storage()
        .persistent()
        .extend_ttl(key, TTL_PERSISTENT, TTL_PERSISTENT);
}

fn token_address(e: &Env) -> Result<Address, CrowdfundError> {
    e.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(CrowdfundError::NotInitialized)
}

fn require_manager(campaign: &Campaign, who: &Address) -> Result<(), CrowdfundError> {
    if campaign.manager != *who {
        return Err(CrowdfundError::NotManager);
    }
    Ok(())
}
