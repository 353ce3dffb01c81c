/// Constant values describing the layout of source and output packages.
///
/// This module contains the folder and file naming conventions of a source
/// package, the XML namespaces used by the documents inside it, and the
/// content types listed in the output manifest.

/// Paths and file names inside a source package.
///
/// All comparisons against these values are ASCII case-insensitive.
pub mod path {
    /// Folder holding the regulation and its metadata documents
    pub const REGULATION_FOLDER: &str = "Regeling/";
    pub const IDENTIFICATION: &str = "Regeling/Identificatie.xml";
    pub const SNAPSHOT: &str = "Regeling/Momentopname.xml";
    pub const METADATA: &str = "Regeling/Metadata.xml";
    pub const FREE_TEXT: &str = "Regeling/Tekst.xml";

    /// Prefix of the first path segment of an information-object folder
    pub const IO_FOLDER_PREFIX: &str = "IO-";
    pub const IO_IDENTIFICATION: &str = "Identificatie.xml";
    pub const IO_METADATA: &str = "Metadata.xml";
    pub const IO_VERSION_METADATA: &str = "VersieMetadata.xml";

    /// Files in an information-object folder that only describe the payload
    pub const IO_METADATA_ONLY: [&str; 5] = [
        "Identificatie.xml",
        "Metadata.xml",
        "VersieMetadata.xml",
        "Momentopname.xml",
        "JuridischeBorging.xml",
    ];

    /// Folder holding the geo-object (OW) files
    pub const GEO_OBJECT_FOLDER: &str = "OW-bestanden/";
    /// Path segment marking geo-object files outside the main folder
    pub const GEO_OBJECT_SEGMENT: &str = "/OW/";
    /// Inventory of the geo-object files; always regenerated
    pub const GEO_OBJECT_MANIFEST: &str = "manifest-ow.xml";

    /// Packing list written by authoring tools; never part of the output
    pub const PACKING_LIST: &str = "pakbon.xml";
    /// Output package manifest; always regenerated and written last
    pub const MANIFEST: &str = "manifest.xml";
}

/// File extensions (lowercase, without dot).
pub mod extension {
    pub const GEOGRAPHIC: &str = "gml";
    pub const DOCUMENT_DATA: &str = "pdf";
    pub const XML: &str = "xml";

    /// Payload extensions of an information object, in order of preference
    pub const PAYLOAD_PRIORITY: [&str; 2] = [GEOGRAPHIC, DOCUMENT_DATA];

    pub const IMAGES: [&str; 6] = ["png", "jpg", "jpeg", "gif", "tif", "tiff"];
}

/// XML namespaces.
pub mod namespace {
    /// STOP data (identification and metadata)
    pub const STOP_DATA: &str = "https://standaarden.overheid.nl/stop/imop/data/";
    /// STOP tekst (regulation and decision text)
    pub const STOP_TEXT: &str = "https://standaarden.overheid.nl/stop/imop/tekst/";
    /// LVBB delivery documents
    pub const LVBB_DELIVERY: &str = "https://standaarden.overheid.nl/lvbb/stop/aanlevering/";
    /// LVBB submission orders and package manifest
    pub const LVBB: &str = "http://www.overheid.nl/2017/lvbb";
    /// IMOW general geographic objects
    pub const IMOW_OBJECT: &str = "http://www.geostandaarden.nl/imow/owobject";
    /// IMOW legal-text objects
    pub const IMOW_RULES: &str = "http://www.geostandaarden.nl/imow/regels";
    /// Manifest of the geo-object files
    pub const MANIFEST_OW: &str = "http://www.geostandaarden.nl/bestanden-ow/manifest-ow";
}

/// Element and attribute names looked up in source documents.
pub mod element {
    pub const WORK: &str = "FRBRWork";
    pub const EXPRESSION: &str = "FRBRExpression";
    pub const GOAL: &str = "doel";
    pub const MAKER: &str = "maker";
    pub const OFFICIAL_TITLE: &str = "officieleTitel";
    pub const LICENSE_TYPE: &str = "soortLicentie";
    pub const PROCEDURE_TYPE: &str = "soortProcedure";

    /// Reference from the regulation text to an information object
    pub const EXTERNAL_REFERENCE: &str = "ExtIoRef";
    pub const REFERENCE_TARGET_ATTR: &str = "ref";
    pub const ELEMENT_ID_ATTR: &str = "eId";

    /// Container of one domain object in a geo-object file
    pub const OW_OBJECT: &str = "owObject";
    pub const STATUS: &str = "status";
    pub const STATUS_TERMINATED: &str = "beëindigen";

    /// Domain objects whose status lives in the IMOW rules namespace
    pub const LEGAL_TEXT_OBJECTS: [&str; 6] = [
        "Regeltekst",
        "Divisietekst",
        "Divisie",
        "Instructieregel",
        "Omgevingswaarderegel",
        "RegelVoorIedereen",
    ];
}

/// Recognised authority tiers (second-to-last segment of the maker path).
pub const AUTHORITY_TYPES: [&str; 4] = ["gemeente", "provincie", "waterschap", "ministerie"];

/// Defaults used when the source package is silent.
pub mod default {
    /// Program token when the work identifier has no usable last segment
    pub const PROGRAM_NAME: &str = "Programma";
    /// Prefix stripped from the last segment of the work identifier
    pub const PROGRAM_PREFIX: &str = "Prg";
    pub const PROCEDURE_TYPE: &str = "/join/id/stop/proceduretype_definitief";
    pub const TOPIC: &str = "/tooi/def/concept/c_301e9bd8";
    pub const DOCUMENT_KIND_PROGRAM: &str = "/join/id/stop/regelingtype_004";
}

/// Content types (MIME types) listed in the output manifest.
pub mod content_type {
    use phf::{Map, phf_map};

    pub const XML: &str = "application/xml";
    pub const GML: &str = "application/gml+xml";
    pub const PDF: &str = "application/pdf";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const TIFF: &str = "image/tiff";
    pub const OCTET_STREAM: &str = "application/octet-stream";

    /// Extension (lowercase) to content type
    pub static BY_EXTENSION: Map<&'static str, &'static str> = phf_map! {
        "xml" => XML,
        "gml" => GML,
        "pdf" => PDF,
        "png" => PNG,
        "jpg" => JPEG,
        "jpeg" => JPEG,
        "gif" => GIF,
        "tif" => TIFF,
        "tiff" => TIFF,
    };
}

/// Output names of geo-object files, keyed by lowercase canonical name.
pub mod geo_rename {
    use phf::{Map, phf_map};

    pub static PUBLICATION: Map<&'static str, &'static str> = phf_map! {
        "divisieteksten.xml" => "owDivisieteksten.xml",
        "regelingsgebieden.xml" => "owRegelingsgebied.xml",
        "locaties.xml" => "owLocaties.xml",
        "gebiedsaanwijzingen.xml" => "owGebiedsaanwijzingen.xml",
    };

    pub static WITHDRAWAL: Map<&'static str, &'static str> = phf_map! {
        "divisieteksten.xml" => "owDivisietekstmarkers.xml",
        "regelingsgebieden.xml" => "owRegelingsgebied.xml",
        "locaties.xml" => "owLocaties.xml",
        "gebiedsaanwijzingen.xml" => "owGebiedsaanwijzingen.xml",
    };

    pub static HAND_OVER: Map<&'static str, &'static str> = phf_map! {
        "divisieteksten.xml" => "owDivisieteksten.xml",
        "regelingsgebieden.xml" => "owRegelingsgebied.xml",
        "locaties.xml" => "owLocaties.xml",
        "gebiedsaanwijzingen.xml" => "owGebiedsaanwijzingen.xml",
    };
}

/// Names of generated documents.
pub mod generated {
    pub const DECISION: &str = "besluit.xml";
    pub const SUBMISSION_ORDER: &str = "opdracht.xml";
    pub const CONSOLIDATION: &str = "consolidatie.xml";
}
