//! Environmental clouds

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::actor::ActorId;

/// Kind of cloud occupying a cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CloudKind {
    #[default]
    Fire = 0,
    Cold = 1,
    Poison = 2,
    Stink = 3,
    Steam = 4,
    Miasma = 5,
    GreySmoke = 6,
    BlueSmoke = 7,
    PurpleSmoke = 8,
    BlackSmoke = 9,
}

impl CloudKind {
    /// Every kind, used when polymorph energy scrambles a cloud
    pub const ALL: [CloudKind; 10] = [
        CloudKind::Fire,
        CloudKind::Cold,
        CloudKind::Poison,
        CloudKind::Stink,
        CloudKind::Steam,
        CloudKind::Miasma,
        CloudKind::GreySmoke,
        CloudKind::BlueSmoke,
        CloudKind::PurpleSmoke,
        CloudKind::BlackSmoke,
    ];
}

/// A cloud with its remaining lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cloud {
    pub kind: CloudKind,
    pub duration: i32,
    /// Actor credited with anything the cloud does
    pub source: Option<ActorId>,
}

impl Cloud {
    pub fn new(kind: CloudKind, duration: i32) -> Self {
        Self {
            kind,
            duration,
            source: None,
        }
    }

    pub fn with_source(mut self, source: Option<ActorId>) -> Self {
        self.source = source;
        self
    }
}
