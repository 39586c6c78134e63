// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactRole {
    Manager,
    Director,
    Vp,
    Founder,
    Analyst,
}

impl ContactRole {
    pub const ALL: [Self; 5] = [
        Self::Manager,
        Self::Director,
        Self::Vp,
        Self::Founder,
        Self::Analyst,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "Manager",
            Self::Director => "Director",
            Self::Vp => "VP",
            Self::Founder => "Founder",
            Self::Analyst => "Analyst",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Manager" => Some(Self::Manager),
            "Director" => Some(Self::Director),
            "VP" => Some(Self::Vp),
            "Founder" => Some(Self::Founder),
            "Analyst" => Some(Self::Analyst),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Won,
    Lost,
}

impl LeadStatus {
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Contacted,
        Self::Qualified,
        Self::Won,
        Self::Lost,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "qualified" => Some(Self::Qualified),
            "won" => Some(Self::Won),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Industry {
    Software,
    Finance,
    Healthcare,
    Retail,
    Manufacturing,
    Media,
}

impl Industry {
    pub const ALL: [Self; 6] = [
        Self::Software,
        Self::Finance,
        Self::Healthcare,
        Self::Retail,
        Self::Manufacturing,
        Self::Media,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Software => "software",
            Self::Finance => "finance",
            Self::Healthcare => "healthcare",
            Self::Retail => "retail",
            Self::Manufacturing => "manufacturing",
            Self::Media => "media",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "software" => Some(Self::Software),
            "finance" => Some(Self::Finance),
            "healthcare" => Some(Self::Healthcare),
            "retail" => Some(Self::Retail),
            "manufacturing" => Some(Self::Manufacturing),
            "media" => Some(Self::Media),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Member,
    Viewer,
}

impl UserRole {
    pub const ALL: [Self; 3] = [Self::Admin, Self::Member, Self::Viewer];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Self::Admin),
            "member" => Some(Self::Member),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Invited,
    Suspended,
}

impl AccountStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Invited, Self::Suspended];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Invited => "invited",
            Self::Suspended => "suspended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "invited" => Some(Self::Invited),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HistoryAction {
    SignIn,
    Export,
    PlanChange,
    InviteSent,
    Search,
}

impl HistoryAction {
    pub const ALL: [Self; 5] = [
        Self::SignIn,
        Self::Export,
        Self::PlanChange,
        Self::InviteSent,
        Self::Search,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "sign_in",
            Self::Export => "export",
            Self::PlanChange => "plan_change",
            Self::InviteSent => "invite_sent",
            Self::Search => "search",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sign_in" => Some(Self::SignIn),
            "export" => Some(Self::Export),
            "plan_change" => Some(Self::PlanChange),
            "invite_sent" => Some(Self::InviteSent),
            "search" => Some(Self::Search),
            _ => None,
        }
    }
}

/// Cosmetic workspace role. Gates what the UI offers to show, never what
/// the data layer returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkspaceRole {
    Admin,
    Member,
}

impl WorkspaceRole {
    pub const fn can_view_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Dashboard,
    Contacts,
    Companies,
    Finder,
    Verifier,
    Billing,
    Settings,
    Linkedin,
    AiChat,
    AdminUsers,
    AdminUserHistory,
}

impl Route {
    pub const ALL: [Self; 11] = [
        Self::Dashboard,
        Self::Contacts,
        Self::Companies,
        Self::Finder,
        Self::Verifier,
        Self::Billing,
        Self::Settings,
        Self::Linkedin,
        Self::AiChat,
        Self::AdminUsers,
        Self::AdminUserHistory,
    ];

    /// Top-level views shown in the navigation bar. Admin views hang off
    /// Settings and are not directly chord-addressable.
    pub const NAV: [Self; 9] = [
        Self::Dashboard,
        Self::Contacts,
        Self::Companies,
        Self::Finder,
        Self::Verifier,
        Self::Billing,
        Self::Settings,
        Self::Linkedin,
        Self::AiChat,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            Self::Dashboard => "/",
            Self::Contacts => "/contacts",
            Self::Companies => "/companies",
            Self::Finder => "/finder",
            Self::Verifier => "/verifier",
            Self::Billing => "/billing",
            Self::Settings => "/settings",
            Self::Linkedin => "/linkedin",
            Self::AiChat => "/ai-chat",
            Self::AdminUsers => "/admin/users",
            Self::AdminUserHistory => "/admin/users/history",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "dash",
            Self::Contacts => "contacts",
            Self::Companies => "companies",
            Self::Finder => "finder",
            Self::Verifier => "verifier",
            Self::Billing => "billing",
            Self::Settings => "settings",
            Self::Linkedin => "linkedin",
            Self::AiChat => "ai chat",
            Self::AdminUsers => "users",
            Self::AdminUserHistory => "user history",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|route| route.path() == path)
    }

    pub const fn requires_admin(self) -> bool {
        matches!(self, Self::AdminUsers | Self::AdminUserHistory)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub company: String,
    pub role: ContactRole,
    pub status: LeadStatus,
    pub score: i64,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub domain: String,
    pub industry: Industry,
    pub employees: i64,
    pub location: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub last_seen: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHistoryEvent {
    pub id: HistoryEventId,
    pub user_name: String,
    pub action: HistoryAction,
    pub detail: String,
    pub occurred_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanTier {
    Free,
    Pro,
    Scale,
}

impl PlanTier {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Scale => "scale",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPlan {
    pub tier: PlanTier,
    pub name: String,
    pub price_cents: i64,
    pub seat_limit: i64,
    pub features: Vec<String>,
}

/// The static plan catalog rendered on the billing view.
pub fn billing_catalog() -> Vec<BillingPlan> {
    vec![
        BillingPlan {
            tier: PlanTier::Free,
            name: "Free".to_owned(),
            price_cents: 0,
            seat_limit: 3,
            features: vec![
                "100 contacts".to_owned(),
                "1 workspace".to_owned(),
                "community support".to_owned(),
            ],
        },
        BillingPlan {
            tier: PlanTier::Pro,
            name: "Pro".to_owned(),
            price_cents: 4_900,
            seat_limit: 25,
            features: vec![
                "10,000 contacts".to_owned(),
                "email finder + verifier".to_owned(),
                "AI summaries".to_owned(),
                "priority support".to_owned(),
            ],
        },
        BillingPlan {
            tier: PlanTier::Scale,
            name: "Scale".to_owned(),
            price_cents: 19_900,
            seat_limit: 200,
            features: vec![
                "unlimited contacts".to_owned(),
                "admin audit history".to_owned(),
                "SSO".to_owned(),
                "dedicated support".to_owned(),
            ],
        },
    ]
}
