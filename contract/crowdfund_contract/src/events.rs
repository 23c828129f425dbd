use soroban_sdk::{contracttype, Address, Env, String, Symbol};

use crate::storage_types::{CampaignId, RequestId};

#[contracttype]
#[derive(Clone)]
pub struct CampaignCreatedEvent {
    pub campaign_id: CampaignId,
    pub manager: Address,
    pub manager_name: String,
    pub name: String,
    pub minimum_contribution: i128,
    pub target: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct ContributionEvent {
    pub campaign_id: CampaignId,
    pub contributor: Address,
    pub amount: i128,
    pub balance: i128,
    pub contributors_count: u32,
}

#[contracttype]
#[derive(Clone)]
pub struct RequestCreatedEvent {
    pub campaign_id: CampaignId,
    pub request_id: RequestId,
    pub recipient: Address,
    pub value: i128,
}

#[contracttype]
#[derive(Clone)]
pub struct RequestVotedEvent {
    pub campaign_id: CampaignId,
    pub request_id: RequestId,
    pub voter: Address,
    pub voters_count: u32,
    pub ready_to_finalize: bool,
}

#[contracttype]
#[derive(Clone)]
pub struct RequestFinalizedEvent {
    pub campaign_id: CampaignId,
    pub request_id: RequestId,
    pub recipient: Address,
    pub value: i128,
    pub balance: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreatedEvent) {
    env.events().publish(
        (Symbol::new(env, "campaign_created"), event.campaign_id),
        event,
    );
}

pub fn emit_contribution(env: &Env, event: ContributionEvent) {
    env.events().publish(
        (Symbol::new(env, "contribution"), event.campaign_id),
        event,
    );
}

pub fn emit_request_created(env: &Env, event: RequestCreatedEvent) {
    env.events().publish(
        (Symbol::new(env, "request_created"), event.campaign_id),
        event,
    );
}

pub fn emit_request_voted(env: &Env, event: RequestVotedEvent) {
    env.events().publish(
        (Symbol::new(env, "request_voted"), event.campaign_id),
        event,
    );
}

pub fn emit_request_finalized(env: &Env, event: RequestFinalizedEvent) {
    env.events().publish(
        (Symbol::new(env, "request_finalized"), event.campaign_id),
        event,
    );
}
