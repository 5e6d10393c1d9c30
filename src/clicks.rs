//! Click events

use std::net::IpAddr;

use chrono::Utc;
use chrono::naive::NaiveDateTime;
use uuid::Uuid;

use crate::links::Link;

/// One resolution of a link, append-only
#[derive(Clone, Debug)]
pub struct ClickEvent {
    /// Click ID
    pub id: Uuid,

    /// The link that was resolved
    pub link_id: Uuid,

    /// Referrer of the request, if any
    pub referrer: Option<String>,

    /// User agent of the request, if any
    pub user_agent: Option<String>,

    /// IP address of the client, if known
    pub ip_address: Option<IpAddr>,

    /// Creation date, in UTC
    pub created_at: NaiveDateTime,
}

impl ClickEvent {
    /// New click on a link, happening now
    pub fn new(link: &Link, context: &ClickContext) -> Self {
        Self {
            id: Uuid::new_v4(),
            link_id: link.id,
            referrer: context.referrer.clone(),
            user_agent: context.user_agent.clone(),
            ip_address: context.ip_address,
            created_at: Utc::now().naive_utc(),
        }
    }
}

/// Request details captured with a click
///
/// Every field is optional, not every request carries them
#[derive(Clone, Debug, Default)]
pub struct ClickContext {
    /// Value of the `Referer` header
    pub referrer: Option<String>,

    /// Value of the `User-Agent` header
    pub user_agent: Option<String>,

    /// IP address of the client
    pub ip_address: Option<IpAddr>,
}
