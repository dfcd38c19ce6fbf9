//! Relations between components

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident => $text:literal,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Wire name
            #[must_use]
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::UnknownName {
                        kind: $kind,
                        name: other.to_string(),
                    }),
                }
            }
        }
    };
}

named_enum!(
    /// Kind of a relation
    RelationType, "relation type" {
        Assembly => "assembly",
        CentralShaft => "central_shaft",
        Contact => "contact",
        Coupling => "coupling",
        Flank => "flank",
        ManufacturingStep => "manufacturing_step",
        OrderedAssembly => "ordered_assembly",
        OrderedReference => "ordered_reference",
        PlanetCarrierShaft => "planet_carrier_shaft",
        PlanetPin => "planet_pin",
        PlanetShaft => "planet_shaft",
        PlanetaryStage => "planetary_stage",
        Reference => "reference",
        Side => "side",
        Stage => "stage",
        StageGearData => "stage_gear_data",
    }
);

named_enum!(
    /// Role a component plays in a relation
    RelationRole, "relation role" {
        Assembly => "assembly",
        Gear => "gear",
        Gear1 => "gear_1",
        Gear2 => "gear_2",
        InnerPart => "inner_part",
        Left => "left",
        ManufacturingSettings => "manufacturing_settings",
        Origin => "origin",
        OuterPart => "outer_part",
        Part => "part",
        PlanetaryStage => "planetary_stage",
        Referenced => "referenced",
        Right => "right",
        Shaft => "shaft",
        Side1 => "side_1",
        Side2 => "side_2",
        Stage => "stage",
        StageGearData => "stage_gear_data",
        Tool => "tool",
        Workpiece => "workpiece",
    }
);

/// One end of a relation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationReference {
    role: RelationRole,
    hint: Option<String>,
    component: u64,
}

impl RelationReference {
    /// `component` is the internal id of the referenced component
    #[must_use]
    pub fn new(role: RelationRole, hint: Option<String>, component: u64) -> Self {
        Self {
            role,
            hint,
            component,
        }
    }

    #[must_use]
    pub fn role(&self) -> RelationRole {
        self.role
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Internal id of the referenced component
    #[must_use]
    pub fn component(&self) -> u64 {
        self.component
    }
}

/// A typed relation between components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    relation_type: RelationType,
    order: Option<u32>,
    references: Vec<RelationReference>,
}

impl Relation {
    #[must_use]
    pub fn new(
        relation_type: RelationType,
        order: Option<u32>,
        references: Vec<RelationReference>,
    ) -> Self {
        Self {
            relation_type,
            order,
            references,
        }
    }

    #[must_use]
    pub fn relation_type(&self) -> RelationType {
        self.relation_type
    }

    #[must_use]
    pub fn order(&self) -> Option<u32> {
        self.order
    }

    #[must_use]
    pub fn references(&self) -> &[RelationReference] {
        &self.references
    }

    /// Check whether a component takes part in this relation
    #[must_use]
    pub fn references_component(&self, internal_id: u64) -> bool {
        self.references.iter().any(|r| r.component == internal_id)
    }
}
