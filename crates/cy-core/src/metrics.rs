//! Growth counters shown in the dashboard header.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Whatsapp,
    Linkedin,
    Instagram,
    Website,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Whatsapp,
        Channel::Linkedin,
        Channel::Instagram,
        Channel::Website,
    ];

    /// Amount added or removed by one manual adjustment.
    pub fn step(self) -> u64 {
        match self {
            Self::Whatsapp => 50,
            Self::Linkedin => 20,
            Self::Instagram => 100,
            Self::Website => 250,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Whatsapp => "whatsapp",
            Self::Linkedin => "linkedin",
            Self::Instagram => "instagram",
            Self::Website => "website",
        }
    }

    /// Case-insensitive lookup by [`Channel::as_str`] name.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == wanted)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Whatsapp => "WhatsApp Members",
            Self::Linkedin => "LinkedIn Followers",
            Self::Instagram => "Instagram Followers",
            Self::Website => "Website Visitors",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub whatsapp: u64,
    pub linkedin: u64,
    pub instagram: u64,
    pub website: u64,
    /// Visitors in the last seven days, as reported by the tracker.
    pub website_weekly: u64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self {
            whatsapp: 4250,
            linkedin: 2890,
            instagram: 8500,
            website: 12500,
            website_weekly: 0,
        }
    }
}

impl Metrics {
    pub fn get(&self, channel: Channel) -> u64 {
        match channel {
            Channel::Whatsapp => self.whatsapp,
            Channel::Linkedin => self.linkedin,
            Channel::Instagram => self.instagram,
            Channel::Website => self.website,
        }
    }

    pub fn set(&mut self, channel: Channel, value: u64) {
        match channel {
            Channel::Whatsapp => self.whatsapp = value,
            Channel::Linkedin => self.linkedin = value,
            Channel::Instagram => self.instagram = value,
            Channel::Website => self.website = value,
        }
    }

    pub fn increment(&mut self, channel: Channel) -> u64 {
        let value = self.get(channel).saturating_add(channel.step());
        self.set(channel, value);
        value
    }

    /// Never goes below zero.
    pub fn decrement(&mut self, channel: Channel) -> u64 {
        let value = self.get(channel).saturating_sub(channel.step());
        self.set(channel, value);
        value
    }
}
