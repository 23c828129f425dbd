use soroban_sdk::{Address, Env, Map, String, Vec};

use crate::extend_persistent;
use crate::storage_types::{CampaignId, CrowdfundError, PersistentKey, Request, RequestId};

/// Withdrawal requests of one campaign, numbered from 0 in creation order.
pub struct RequestStore<'a> {
    env: &'a Env,
    campaign_id: CampaignId,
}

impl<'a> RequestStore<'a> {
    pub fn new(env: &'a Env, campaign_id: CampaignId) -> Self {
        Self { env, campaign_id }
    }

    pub fn count(&self) -> u32 {
        self.env
            .storage()
            .persistent()
            .get(&PersistentKey::RequestCount(self.campaign_id))
            .unwrap_or(0)
    }

    pub fn create_request(
        &self,
        description: String,
        recipient: Address,
        value: i128,
    ) -> Result<RequestId, CrowdfundError> {
        if value <= 0 {
            return Err(CrowdfundError::InvalidAmount);
        }

        let id = self.count();
        let next_id = id.checked_add(1).ok_or(CrowdfundError::Overflow)?;

        let request = Request {
            id,
            description,
            value,
            recipient,
            voters: Map::new(self.env),
            voters_count: 0,
            completed: false,
        };
        self.put(&request);

        let count_key = PersistentKey::RequestCount(self.campaign_id);
        self.env.storage().persistent().set(&count_key, &next_id);
        extend_persistent(self.env, &count_key);

        Ok(id)
    }

    pub fn get(&self, id: RequestId) -> Result<Request, CrowdfundError> {
        self.env
            .storage()
            .persistent()
            .get(&PersistentKey::Request(self.campaign_id, id))
            .ok_or(CrowdfundError::NotFound)
    }

    /// Persists a request returned by the state machine.
    pub fn put(&self, request: &Request) {
        let key = PersistentKey::Request(self.campaign_id, request.id);
        self.env.storage().persistent().set(&key, request);
        extend_persistent(self.env, &key);
    }

    pub fn all(&self) -> Vec<Request> {
        let mut requests = Vec::new(self.env);
        for id in 0..self.count() {
            if let Ok(request) = self.get(id) {
                requests.push_back(request);
            }
        }
        requests
    }
}
