//! Static table of files always embedded in the archive.
//!
//! Every published archive carries a machine-readable copy of the project
//! descriptor and assembly descriptor plus a human-readable license summary
//! and manifest at well-known `META-INF` locations. The table is read-only
//! configuration, resolved once per publish run: `${basedir}`,
//! `${groupId}`, and `${artifactId}` in the path templates come from the
//! project record, and entries flagged for filtering additionally have
//! their contents passed through the content token table.

/// One entry of the auxiliary-file table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxiliaryFile {
    /// Source path template, resolved against `${basedir}`.
    pub source: &'static str,
    /// Destination directory template inside the archive root, with a
    /// trailing slash.
    pub destination: &'static str,
    /// Whether the file contents are template-filtered before archiving.
    pub filter: bool,
}

/// The fixed, ordered auxiliary-file table.
///
/// The filtered `META-INF/` copies of the license summary and manifest are
/// the rendered, human-readable variants; the copies under the Maven
/// descriptor directory preserve the raw templates.
pub const AUXILIARY_FILES: [AuxiliaryFile; 6] = [
    AuxiliaryFile {
        source: "${basedir}/pom.xml",
        destination: "META-INF/maven/${groupId}/${artifactId}/",
        filter: false,
    },
    AuxiliaryFile {
        source: "${basedir}/src/assembly/assembly.xml",
        destination: "META-INF/maven/${groupId}/${artifactId}/src/assembly/",
        filter: false,
    },
    AuxiliaryFile {
        source: "${basedir}/src/assembly/LICENSE.txt",
        destination: "META-INF/",
        filter: true,
    },
    AuxiliaryFile {
        source: "${basedir}/src/assembly/LICENSE.txt",
        destination: "META-INF/maven/${groupId}/${artifactId}/src/assembly/",
        filter: false,
    },
    AuxiliaryFile {
        source: "${basedir}/src/assembly/MANIFEST.MF",
        destination: "META-INF/",
        filter: true,
    },
    AuxiliaryFile {
        source: "${basedir}/src/assembly/MANIFEST.MF",
        destination: "META-INF/maven/${groupId}/${artifactId}/src/assembly/",
        filter: false,
    },
];
