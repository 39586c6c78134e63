// Copyright 2026 HyperDash Contributors
// Licensed under the Apache License, Version 2.0

//! Deterministic mock-data generation for the dashboard views. Everything
//! the list views show is produced here at startup; the same seed always
//! yields the same workspace.

use hyperdash_app::{
    AccountStatus, AdminUser, BillingPlan, Company, CompanyId, Contact, ContactId, ContactRole,
    HistoryAction, HistoryEventId, Industry, LeadStatus, UserHistoryEvent, UserId, UserRole,
    billing_catalog,
};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const FIRST_NAMES: [&str; 16] = [
    "Avery", "Jordan", "Taylor", "Riley", "Morgan", "Casey", "Alex", "Quinn", "Parker", "Drew",
    "Kai", "Elliot", "Robin", "Cameron", "Hayden", "Rowan",
];
const LAST_NAMES: [&str; 18] = [
    "Walker", "Martin", "Hill", "Evans", "Lopez", "Gray", "Ward", "Young", "Diaz", "Reed",
    "Campbell", "Turner", "Flores", "Bennett", "Price", "Morris", "Foster", "Brooks",
];

const COMPANY_STEMS: [&str; 14] = [
    "Lumen", "Vertex", "North", "Cobalt", "Ember", "Halcyon", "Quartz", "Meridian", "Alder",
    "Summit", "Harbor", "Cinder", "Atlas", "Juniper",
];
const COMPANY_SUFFIXES: [&str; 8] = [
    "Labs", "Systems", "Works", "Group", "Analytics", "Health", "Retail", "Dynamics",
];

const LOCATIONS: [&str; 12] = [
    "Austin, TX",
    "Seattle, WA",
    "Denver, CO",
    "Raleigh, NC",
    "Portland, OR",
    "Nashville, TN",
    "Columbus, OH",
    "Minneapolis, MN",
    "Boston, MA",
    "Chicago, IL",
    "San Diego, CA",
    "Atlanta, GA",
];

const FREE_MAIL_DOMAINS: [&str; 4] = [
    "gmail.example.com",
    "outlook.example.com",
    "proton.example.com",
    "mail.example.net",
];

const HISTORY_DETAILS: [&str; 8] = [
    "from new device",
    "contacts CSV",
    "upgraded to Pro",
    "invited teammate",
    "queried \"fintech CTOs\"",
    "companies CSV",
    "downgraded to Free",
    "password reset",
];

const CONTACT_ROLES: [ContactRole; 5] = [
    ContactRole::Manager,
    ContactRole::Director,
    ContactRole::Vp,
    ContactRole::Founder,
    ContactRole::Analyst,
];
const LEAD_STATUSES: [LeadStatus; 5] = [
    LeadStatus::New,
    LeadStatus::Contacted,
    LeadStatus::Qualified,
    LeadStatus::Won,
    LeadStatus::Lost,
];
const INDUSTRIES: [Industry; 6] = [
    Industry::Software,
    Industry::Finance,
    Industry::Healthcare,
    Industry::Retail,
    Industry::Manufacturing,
    Industry::Media,
];
const USER_ROLES: [UserRole; 3] = [UserRole::Admin, UserRole::Member, UserRole::Viewer];
const ACCOUNT_STATUSES: [AccountStatus; 3] = [
    AccountStatus::Active,
    AccountStatus::Invited,
    AccountStatus::Suspended,
];
const HISTORY_ACTIONS: [HistoryAction; 5] = [
    HistoryAction::SignIn,
    HistoryAction::Export,
    HistoryAction::PlanChange,
    HistoryAction::InviteSent,
    HistoryAction::Search,
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// How many rows of each kind [`CrmFaker::workspace`] generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceCounts {
    pub contacts: usize,
    pub companies: usize,
    pub admin_users: usize,
    pub history_events: usize,
}

impl Default for WorkspaceCounts {
    fn default() -> Self {
        Self {
            contacts: 120,
            companies: 45,
            admin_users: 18,
            history_events: 80,
        }
    }
}

/// Everything the views read, generated once at startup and held in memory
/// for the session.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub contacts: Vec<Contact>,
    pub companies: Vec<Company>,
    pub admin_users: Vec<AdminUser>,
    pub history: Vec<UserHistoryEvent>,
    pub plans: Vec<BillingPlan>,
}

#[derive(Debug, Clone)]
pub struct CrmFaker {
    rng: DeterministicRng,
    next_id: i64,
}

impl CrmFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            next_id: 1,
        }
    }

    pub fn workspace(&mut self, counts: WorkspaceCounts) -> Workspace {
        let companies: Vec<Company> = (0..counts.companies).map(|_| self.company()).collect();
        let contacts = (0..counts.contacts)
            .map(|_| {
                if companies.is_empty() {
                    self.contact()
                } else {
                    let company = &companies[self.rng.int_n(companies.len())];
                    self.contact_at(company)
                }
            })
            .collect();
        let admin_users: Vec<AdminUser> =
            (0..counts.admin_users).map(|_| self.admin_user()).collect();
        let history = (0..counts.history_events)
            .map(|_| {
                if admin_users.is_empty() {
                    self.history_event()
                } else {
                    let user = &admin_users[self.rng.int_n(admin_users.len())];
                    self.history_event_for(&user.name)
                }
            })
            .collect();

        Workspace {
            contacts,
            companies,
            admin_users,
            history,
            plans: billing_catalog(),
        }
    }

    pub fn contact(&mut self) -> Contact {
        let company = self.company();
        self.contact_at(&company)
    }

    pub fn contact_at(&mut self, company: &Company) -> Contact {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        Contact {
            id: ContactId::new(self.next_id()),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}@{}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase(),
                company.domain
            ),
            company: company.name.clone(),
            role: CONTACT_ROLES[self.rng.int_n(CONTACT_ROLES.len())],
            status: LEAD_STATUSES[self.rng.int_n(LEAD_STATUSES.len())],
            score: self.int_range_i64(0, 100),
            created_at: self.datetime_within_days(365),
        }
    }

    pub fn company(&mut self) -> Company {
        let stem = self.pick(&COMPANY_STEMS);
        let suffix = self.pick(&COMPANY_SUFFIXES);
        Company {
            id: CompanyId::new(self.next_id()),
            name: format!("{stem} {suffix}"),
            domain: format!(
                "{}{}.example.com",
                stem.to_ascii_lowercase(),
                suffix.to_ascii_lowercase()
            ),
            industry: INDUSTRIES[self.rng.int_n(INDUSTRIES.len())],
            employees: self.int_range_i64(5, 5_000),
            location: self.pick(&LOCATIONS).to_owned(),
            created_at: self.datetime_within_days(1_460),
        }
    }

    pub fn admin_user(&mut self) -> AdminUser {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let domain = self.pick(&FREE_MAIL_DOMAINS);
        AdminUser {
            id: UserId::new(self.next_id()),
            name: format!("{first} {last}"),
            email: format!(
                "{}.{}@{domain}",
                first.to_ascii_lowercase(),
                last.to_ascii_lowercase()
            ),
            role: USER_ROLES[self.rng.int_n(USER_ROLES.len())],
            status: ACCOUNT_STATUSES[self.rng.int_n(ACCOUNT_STATUSES.len())],
            last_seen: self.datetime_within_days(60),
        }
    }

    pub fn history_event(&mut self) -> UserHistoryEvent {
        let first = self.pick(&FIRST_NAMES);
        let last = self.pick(&LAST_NAMES);
        let name = format!("{first} {last}");
        self.history_event_for(&name)
    }

    pub fn history_event_for(&mut self, user_name: &str) -> UserHistoryEvent {
        UserHistoryEvent {
            id: HistoryEventId::new(self.next_id()),
            user_name: user_name.to_owned(),
            action: HISTORY_ACTIONS[self.rng.int_n(HISTORY_ACTIONS.len())],
            detail: self.pick(&HISTORY_DETAILS).to_owned(),
            occurred_at: self.datetime_within_days(90),
        }
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn datetime_within_days(&mut self, days: i64) -> OffsetDateTime {
        let end = reference_now();
        let start = end - Duration::days(days.max(1));
        let span = (end - start).whole_seconds() as u64;
        start + Duration::seconds((self.rng.next_u64() % (span + 1)) as i64)
    }
}

// Fixed reference instant so generated timestamps are stable across runs.
fn reference_now() -> OffsetDateTime {
    datetime!(2026-01-01 0:00 UTC)
}

#[cfg(test)]
mod tests {
    use super::{CrmFaker, WorkspaceCounts};
    use std::collections::BTreeSet;

    #[test]
    fn same_seed_same_workspace() {
        let counts = WorkspaceCounts::default();
        let left = CrmFaker::new(42).workspace(counts);
        let right = CrmFaker::new(42).workspace(counts);
        assert_eq!(left, right);
    }

    #[test]
    fn workspace_respects_counts() {
        let counts = WorkspaceCounts {
            contacts: 25,
            companies: 7,
            admin_users: 4,
            history_events: 11,
        };
        let workspace = CrmFaker::new(7).workspace(counts);
        assert_eq!(workspace.contacts.len(), 25);
        assert_eq!(workspace.companies.len(), 7);
        assert_eq!(workspace.admin_users.len(), 4);
        assert_eq!(workspace.history.len(), 11);
        assert_eq!(workspace.plans.len(), 3);
    }

    #[test]
    fn zero_parent_counts_still_produce_dependents() {
        let counts = WorkspaceCounts {
            contacts: 5,
            companies: 0,
            admin_users: 0,
            history_events: 6,
        };
        let workspace = CrmFaker::new(13).workspace(counts);
        assert_eq!(workspace.contacts.len(), 5);
        assert!(workspace.companies.is_empty());
        assert!(workspace.admin_users.is_empty());
        assert_eq!(workspace.history.len(), 6);
        for contact in &workspace.contacts {
            assert!(!contact.company.is_empty());
        }
    }

    #[test]
    fn ids_are_unique_across_entity_kinds() {
        let workspace = CrmFaker::new(3).workspace(WorkspaceCounts::default());
        let mut ids = BTreeSet::new();
        for contact in &workspace.contacts {
            assert!(ids.insert(contact.id.get()));
        }
        for company in &workspace.companies {
            assert!(ids.insert(company.id.get()));
        }
        for user in &workspace.admin_users {
            assert!(ids.insert(user.id.get()));
        }
        for event in &workspace.history {
            assert!(ids.insert(event.id.get()));
        }
    }

    #[test]
    fn contact_email_uses_company_domain() {
        let mut faker = CrmFaker::new(9);
        let company = faker.company();
        let contact = faker.contact_at(&company);
        assert!(contact.email.ends_with(&company.domain), "{}", contact.email);
        assert_eq!(contact.company, company.name);
    }

    #[test]
    fn scores_stay_in_range() {
        let mut faker = CrmFaker::new(11);
        for _ in 0..200 {
            let contact = faker.contact();
            assert!((0..=100).contains(&contact.score));
        }
    }

    #[test]
    fn variety_across_seeds() {
        let mut names = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            let mut faker = CrmFaker::new(seed);
            names.insert(faker.company().name);
        }
        assert!(names.len() >= 10, "got {}", names.len());
    }
}
