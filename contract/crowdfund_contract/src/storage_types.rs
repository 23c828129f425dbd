use soroban_sdk::{contracterror, contracttype, Address, Map, String};

// Storage keys for instance data
#[derive(Clone)]
#[contracttype]
pub enum DataKey {
    Admin, // deployer recorded at initialize; its presence marks the contract initialized
    Token,
    NextCampaignId,
}

// Storage keys for persistent data
#[derive(Clone)]
#[contracttype]
pub enum PersistentKey {
    Campaign(CampaignId),
    Contributor(CampaignId, Address), // (CampaignID, Contributor) -> total contributed
    RequestCount(CampaignId),
    Request(CampaignId, RequestId),
}

pub type CampaignId = u64;
pub type RequestId = u32;

#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Campaign {
    pub id: CampaignId,
    pub manager: Address,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub manager_name: String,
    pub minimum_contribution: i128,
    pub target: i128,
    pub balance: i128,
    pub contributors_count: u32,
    pub total_contributed: i128,
    pub total_withdrawn: i128,
    pub created_at: u64,
}

/// A withdrawal proposed by the campaign manager. Funds only move once a
/// strict majority of contributors has approved it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct Request {
    pub id: RequestId,
    pub description: String,
    pub value: i128,
    pub recipient: Address,
    pub voters: Map<Address, bool>,
    pub voters_count: u32,
    pub completed: bool,
}

// Read model consumed by the campaign page
#[derive(Clone, Debug, Eq, PartialEq)]
#[contracttype]
pub struct CampaignSummary {
    pub minimum_contribution: i128,
    pub balance: i128,
    pub requests_count: u32,
    pub contributors_count: u32,
    pub manager: Address,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub manager_name: String,
    pub target: i128,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CrowdfundError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    CampaignNotFound = 3,
    NotFound = 4,
    NotManager = 5,
    NotContributor = 6,
    InvalidAmount = 7,
    InsufficientContribution = 8,
    InsufficientFunds = 9,
    AlreadyVoted = 10,
    QuorumSaturated = 11,
    QuorumNotReached = 12,
    RequestCompleted = 13,
    Overflow = 14,
}

// Constants
pub const TTL_INSTANCE: u32 = 17280 * 30; // 30 days
pub const TTL_PERSISTENT: u32 = 17280 * 90; // 90 days
