//! Catalogue of known artefact data-type tags.
//!
//! The pipeline accepts any free-form data-type tag, but the CLI offers
//! the known catalogue for validation and help text. Each entry pairs a
//! human-readable description with the short tag used in archive file
//! names.

use std::fmt;

/// A known artefact data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtefactType {
    /// ISAAC database format.
    Ibdb,
    /// ISAAC EConcept format.
    EConcept,
    /// ISAAC changeset format.
    ChangeSet,
    /// Knowledge Is Everything (Drools) package.
    Kie,
    /// CDS knowledge artifact.
    CdsKnowledgeArtifact,
    /// Release Format 2 terminology release.
    Rf2,
    /// Web Ontology Language document.
    Owl,
}

/// All catalogue entries, in declaration order.
pub const ALL_TYPES: [ArtefactType; 7] = [
    ArtefactType::Ibdb,
    ArtefactType::EConcept,
    ArtefactType::ChangeSet,
    ArtefactType::Kie,
    ArtefactType::CdsKnowledgeArtifact,
    ArtefactType::Rf2,
    ArtefactType::Owl,
];

impl ArtefactType {
    /// Return the human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Ibdb => "ISAAC Database Format",
            Self::EConcept => "ISAAC EConcept Format",
            Self::ChangeSet => "ISAAC Changeset Format",
            Self::Kie => "Knowledge Is Everything (Drools)",
            Self::CdsKnowledgeArtifact => "CDS Knowledge Artifact",
            Self::Rf2 => "Release Format 2",
            Self::Owl => "Web Ontology Language",
        }
    }

    /// Return the short tag used in archive file names.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Ibdb => "bdb",
            Self::EConcept => "ec",
            Self::ChangeSet => "ec_cs",
            Self::Kie => "kie",
            Self::CdsKnowledgeArtifact => "cds_ka",
            Self::Rf2 => "RF2",
            Self::Owl => "owl",
        }
    }

    /// Return the catalogue variant name.
    #[must_use]
    pub const fn variant_name(self) -> &'static str {
        match self {
            Self::Ibdb => "IBDB",
            Self::EConcept => "EConcept",
            Self::ChangeSet => "ChangeSet",
            Self::Kie => "KIE",
            Self::CdsKnowledgeArtifact => "CDSKnowledgeArtifact",
            Self::Rf2 => "RF2",
            Self::Owl => "OWL",
        }
    }

    /// Look a type up by variant name, description, or tag,
    /// case-insensitively.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        ALL_TYPES.into_iter().find(|t| {
            value.eq_ignore_ascii_case(t.variant_name())
                || value.eq_ignore_ascii_case(t.description())
                || value.eq_ignore_ascii_case(t.tag())
        })
    }
}

impl fmt::Display for ArtefactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.tag())
    }
}
