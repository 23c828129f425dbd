use soroban_sdk::{Address, Env};

use crate::extend_persistent;
use crate::storage_types::{Campaign, CampaignId, CrowdfundError, PersistentKey};

/// Funds and contributor set of a single campaign.
///
/// The ledger is the only writer of `balance` and of the contributor
/// entries. Every mutating call validates first and writes afterwards, so a
/// rejected call leaves storage as it was.
pub struct CampaignLedger<'a> {
    env: &'a Env,
    campaign: Campaign,
}

impl<'a> CampaignLedger<'a> {
    /// Stores a freshly created campaign and returns its ledger.
    pub fn create(env: &'a Env, campaign: Campaign) -> Self {
        let ledger = Self { env, campaign };
        ledger.store();
        ledger
    }

    pub fn load(env: &'a Env, campaign_id: CampaignId) -> Result<Self, CrowdfundError> {
        let campaign = env
            .storage()
            .persistent()
            .get(&PersistentKey::Campaign(campaign_id))
            .ok_or(CrowdfundError::CampaignNotFound)?;
        Ok(Self { env, campaign })
    }

    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub fn balance(&self) -> i128 {
        self.campaign.balance
    }

    pub fn contributors_count(&self) -> u32 {
        self.campaign.contributors_count
    }

    pub fn is_contributor(&self, who: &Address) -> bool {
        self.env
            .storage()
            .persistent()
            .has(&self.contributor_key(who))
    }

    /// Total amount `who` has put into this campaign, 0 for strangers.
    pub fn contribution_of(&self, who: &Address) -> i128 {
        self.env
            .storage()
            .persistent()
            .get(&self.contributor_key(who))
            .unwrap_or(0)
    }

    pub fn contribute(&mut self, who: &Address, amount: i128) -> Result<(), CrowdfundError> {
        if amount < self.campaign.minimum_contribution {
            return Err(CrowdfundError::InsufficientContribution);
        }

        let previous = self.contribution_of(who);
        let is_new = !self.is_contributor(who);

        let contributed = previous
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;
        let balance = self
            .campaign
            .balance
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;
        let total_contributed = self
            .campaign
            .total_contributed
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;
        let contributors_count = if is_new {
            self.campaign
                .contributors_count
                .checked_add(1)
                .ok_or(CrowdfundError::Overflow)?
        } else {
            self.campaign.contributors_count
        };

        self.campaign.balance = balance;
        self.campaign.total_contributed = total_contributed;
        self.campaign.contributors_count = contributors_count;

        let key = self.contributor_key(who);
        self.env.storage().persistent().set(&key, &contributed);
        extend_persistent(self.env, &key);
        self.store();

        Ok(())
    }

    /// Takes `amount` out of the balance. Only a successful finalize calls this.
    pub fn record_withdrawal(&mut self, amount: i128) -> Result<(), CrowdfundError> {
        if amount <= 0 {
            return Err(CrowdfundError::InvalidAmount);
        }
        if amount > self.campaign.balance {
            return Err(CrowdfundError::InsufficientFunds);
        }
        let total_withdrawn = self
            .campaign
            .total_withdrawn
            .checked_add(amount)
            .ok_or(CrowdfundError::Overflow)?;

        self.campaign.balance -= amount;
        self.campaign.total_withdrawn = total_withdrawn;
        self.store();

        Ok(())
    }

    fn contributor_key(&self, who: &Address) -> PersistentKey {
        PersistentKey::Contributor(self.campaign.id, who.clone())
    }

    fn store(&self) {
        let key = PersistentKey::Campaign(self.campaign.id);
        self.env.storage().persistent().set(&key, &self.campaign);
        extend_persistent(self.env, &key);
    }
}
