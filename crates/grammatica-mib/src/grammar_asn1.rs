//! `AsnGrammar` (part of C8): the token and production patterns for the
//! ASN.1/SMI subset this crate understands — module header, `IMPORTS`,
//! the `OBJECT IDENTIFIER`/`MODULE-IDENTITY`/`OBJECT-TYPE`/type-alias
//! assignments, the SMIv2 macros (`NOTIFICATION-TYPE`, `OBJECT-IDENTITY`,
//! `OBJECT-GROUP`, `NOTIFICATION-GROUP`, `MODULE-COMPLIANCE`,
//! `AGENT-CAPABILITIES`), and `SEQUENCE`/`SEQUENCE OF`/`BITS`/enumerated
//! `INTEGER` types with their constraints and named-number lists. This is
//! the "configuration the core accepts" named in §1 of the distilled
//! spec: a plain Rust function assembling pattern values, not a
//! generated parser for the full ASN.1 grammar.

use grammatica_core::buffer::CharBuffer;
use grammatica_core::grammar::{Element, ProductionId, ProductionPattern};
use grammatica_core::regex::Regex;
use grammatica_core::token::{TokenId, TokenPattern};
use grammatica_core::tokenizer::Tokenizer;
use indexmap::IndexMap;

pub mod tok {
    use super::TokenId;

    pub const ASSIGN: TokenId = 1;
    pub const LBRACE: TokenId = 2;
    pub const RBRACE: TokenId = 3;
    pub const LPAREN: TokenId = 4;
    pub const RPAREN: TokenId = 5;
    pub const COMMA: TokenId = 6;
    pub const SEMI: TokenId = 7;
    pub const DEFINITIONS_KW: TokenId = 8;
    pub const BEGIN_KW: TokenId = 9;
    pub const END_KW: TokenId = 10;
    pub const IMPORTS_KW: TokenId = 11;
    pub const FROM_KW: TokenId = 12;
    pub const OBJECT_KW: TokenId = 13;
    pub const IDENTIFIER_KW: TokenId = 14;
    pub const OBJECT_TYPE_KW: TokenId = 15;
    pub const MODULE_IDENTITY_KW: TokenId = 16;
    pub const SYNTAX_KW: TokenId = 17;
    pub const MAX_ACCESS_KW: TokenId = 18;
    pub const ACCESS_KW: TokenId = 19;
    pub const STATUS_KW: TokenId = 20;
    pub const DESCRIPTION_KW: TokenId = 21;
    pub const LAST_UPDATED_KW: TokenId = 22;
    pub const ORGANIZATION_KW: TokenId = 23;
    pub const CONTACT_INFO_KW: TokenId = 24;
    pub const INTEGER_KW: TokenId = 25;
    pub const OCTET_KW: TokenId = 26;
    pub const STRING_KW: TokenId = 27;
    pub const NUMBER: TokenId = 28;
    pub const TYPE_REF: TokenId = 29;
    pub const LOWER_ID: TokenId = 30;
    pub const TEXT: TokenId = 31;
    pub const WS: TokenId = 32;
    pub const COMMENT: TokenId = 33;
    pub const SEQUENCE_KW: TokenId = 34;
    pub const OF_KW: TokenId = 35;
    pub const BITS_KW: TokenId = 36;
    pub const NOTIFICATION_TYPE_KW: TokenId = 37;
    pub const OBJECT_IDENTITY_KW: TokenId = 38;
    pub const OBJECT_GROUP_KW: TokenId = 39;
    pub const NOTIFICATION_GROUP_KW: TokenId = 40;
    pub const MODULE_COMPLIANCE_KW: TokenId = 41;
    pub const AGENT_CAPABILITIES_KW: TokenId = 42;
    pub const OBJECTS_KW: TokenId = 43;
    pub const NOTIFICATIONS_KW: TokenId = 44;
    pub const GROUP_KW: TokenId = 45;
    pub const MANDATORY_GROUPS_KW: TokenId = 46;
    pub const MODULE_KW: TokenId = 47;
    pub const PRODUCT_RELEASE_KW: TokenId = 48;
    pub const SUPPORTS_KW: TokenId = 49;
    pub const INCLUDES_KW: TokenId = 50;
    pub const VARIATION_KW: TokenId = 51;
    pub const REFERENCE_KW: TokenId = 52;
    pub const WRITE_SYNTAX_KW: TokenId = 53;
    pub const MIN_ACCESS_KW: TokenId = 54;
    pub const DOTDOT: TokenId = 55;
    pub const PIPE: TokenId = 56;
}

pub mod prod {
    use super::ProductionId;

    pub const MODULE: ProductionId = 100;
    pub const IMPORTS: ProductionId = 101;
    pub const IMPORT_GROUP: ProductionId = 102;
    pub const IMPORT_SYMBOL: ProductionId = 103;
    pub const IMPORT_SYMBOL_TAIL: ProductionId = 104;
    pub const ASSIGNMENT: ProductionId = 105;
    pub const OID_VALUE_ASSIGNMENT: ProductionId = 106;
    pub const MODULE_IDENTITY_ASSIGNMENT: ProductionId = 107;
    pub const OBJECT_TYPE_ASSIGNMENT: ProductionId = 108;
    pub const TYPE_ALIAS_ASSIGNMENT: ProductionId = 109;
    pub const OID_VALUE: ProductionId = 110;
    pub const OID_COMPONENT: ProductionId = 111;
    pub const NAMED_NUMBER_SUFFIX: ProductionId = 112;
    pub const SYNTAX_SPEC: ProductionId = 113;
    pub const ACCESS_KEYWORD: ProductionId = 114;
    pub const REFERENCE_CLAUSE: ProductionId = 115;
    pub const ID_LIST: ProductionId = 116;
    pub const OBJECTS_CLAUSE: ProductionId = 117;
    pub const NOTIFICATIONS_CLAUSE: ProductionId = 118;
    pub const OBJECT_IDENTITY_ASSIGNMENT: ProductionId = 119;
    pub const NOTIFICATION_TYPE_ASSIGNMENT: ProductionId = 120;
    pub const OBJECT_GROUP_ASSIGNMENT: ProductionId = 121;
    pub const NOTIFICATION_GROUP_ASSIGNMENT: ProductionId = 122;
    pub const MODULE_COMPLIANCE_ASSIGNMENT: ProductionId = 123;
    pub const COMPLIANCE_MODULE: ProductionId = 124;
    pub const MANDATORY_GROUPS_CLAUSE: ProductionId = 125;
    pub const COMPLIANCE_ITEM: ProductionId = 126;
    pub const SYNTAX_CLAUSE: ProductionId = 127;
    pub const WRITE_SYNTAX_CLAUSE: ProductionId = 128;
    pub const MIN_ACCESS_CLAUSE: ProductionId = 129;
    pub const AGENT_CAPABILITIES_ASSIGNMENT: ProductionId = 130;
    pub const SUPPORTS_CLAUSE: ProductionId = 131;
    pub const VARIATION_CLAUSE: ProductionId = 132;
    pub const DESCRIPTION_CLAUSE: ProductionId = 133;
    pub const FIELD: ProductionId = 134;
    pub const FIELD_TAIL: ProductionId = 135;
    pub const NAMED_NUMBER_LIST: ProductionId = 136;
    pub const NAMED_NUMBER_ITEM: ProductionId = 137;
    pub const NAMED_NUMBER_TAIL: ProductionId = 138;
    pub const CONSTRAINT: ProductionId = 139;
    pub const CONSTRAINT_TERM: ProductionId = 140;
    pub const CONSTRAINT_RANGE_TAIL: ProductionId = 141;
    pub const CONSTRAINT_TERM_TAIL: ProductionId = 142;
}

/// Builds a [`Tokenizer`] over `source` with every keyword registered
/// ahead of the generic `TYPE_REF`/`LOWER_ID` patterns, so a tie (a
/// keyword spelled exactly like an identifier) resolves in the keyword's
/// favor per the tokenizer's documented tie-break rule.
pub fn build_tokenizer(source: &str) -> Tokenizer {
    let mut t = Tokenizer::new(CharBuffer::from_str(source));
    let literal = |id, name: &str, image: &str| TokenPattern::string(id, name, image);
    t.add_pattern(literal(tok::ASSIGN, "ASSIGN", "::="));
    t.add_pattern(literal(tok::LBRACE, "LBRACE", "{"));
    t.add_pattern(literal(tok::RBRACE, "RBRACE", "}"));
    t.add_pattern(literal(tok::LPAREN, "LPAREN", "("));
    t.add_pattern(literal(tok::RPAREN, "RPAREN", ")"));
    t.add_pattern(literal(tok::COMMA, "COMMA", ","));
    t.add_pattern(literal(tok::SEMI, "SEMI", ";"));
    t.add_pattern(literal(tok::DEFINITIONS_KW, "DEFINITIONS", "DEFINITIONS"));
    t.add_pattern(literal(tok::BEGIN_KW, "BEGIN", "BEGIN"));
    t.add_pattern(literal(tok::END_KW, "END", "END"));
    t.add_pattern(literal(tok::IMPORTS_KW, "IMPORTS", "IMPORTS"));
    t.add_pattern(literal(tok::FROM_KW, "FROM", "FROM"));
    t.add_pattern(literal(tok::OBJECT_TYPE_KW, "OBJECT-TYPE", "OBJECT-TYPE"));
    t.add_pattern(literal(tok::MODULE_IDENTITY_KW, "MODULE-IDENTITY", "MODULE-IDENTITY"));
    t.add_pattern(literal(tok::OBJECT_KW, "OBJECT", "OBJECT"));
    t.add_pattern(literal(tok::IDENTIFIER_KW, "IDENTIFIER", "IDENTIFIER"));
    t.add_pattern(literal(tok::SYNTAX_KW, "SYNTAX", "SYNTAX"));
    t.add_pattern(literal(tok::MAX_ACCESS_KW, "MAX-ACCESS", "MAX-ACCESS"));
    t.add_pattern(literal(tok::ACCESS_KW, "ACCESS", "ACCESS"));
    t.add_pattern(literal(tok::STATUS_KW, "STATUS", "STATUS"));
    t.add_pattern(literal(tok::DESCRIPTION_KW, "DESCRIPTION", "DESCRIPTION"));
    t.add_pattern(literal(tok::LAST_UPDATED_KW, "LAST-UPDATED", "LAST-UPDATED"));
    t.add_pattern(literal(tok::ORGANIZATION_KW, "ORGANIZATION", "ORGANIZATION"));
    t.add_pattern(literal(tok::CONTACT_INFO_KW, "CONTACT-INFO", "CONTACT-INFO"));
    t.add_pattern(literal(tok::INTEGER_KW, "INTEGER", "INTEGER"));
    t.add_pattern(literal(tok::OCTET_KW, "OCTET", "OCTET"));
    t.add_pattern(literal(tok::STRING_KW, "STRING", "STRING"));
    t.add_pattern(literal(tok::SEQUENCE_KW, "SEQUENCE", "SEQUENCE"));
    t.add_pattern(literal(tok::OF_KW, "OF", "OF"));
    t.add_pattern(literal(tok::BITS_KW, "BITS", "BITS"));
    t.add_pattern(literal(tok::NOTIFICATION_TYPE_KW, "NOTIFICATION-TYPE", "NOTIFICATION-TYPE"));
    t.add_pattern(literal(tok::OBJECT_IDENTITY_KW, "OBJECT-IDENTITY", "OBJECT-IDENTITY"));
    t.add_pattern(literal(tok::OBJECT_GROUP_KW, "OBJECT-GROUP", "OBJECT-GROUP"));
    t.add_pattern(literal(tok::NOTIFICATION_GROUP_KW, "NOTIFICATION-GROUP", "NOTIFICATION-GROUP"));
    t.add_pattern(literal(tok::MODULE_COMPLIANCE_KW, "MODULE-COMPLIANCE", "MODULE-COMPLIANCE"));
    t.add_pattern(literal(tok::AGENT_CAPABILITIES_KW, "AGENT-CAPABILITIES", "AGENT-CAPABILITIES"));
    t.add_pattern(literal(tok::OBJECTS_KW, "OBJECTS", "OBJECTS"));
    t.add_pattern(literal(tok::NOTIFICATIONS_KW, "NOTIFICATIONS", "NOTIFICATIONS"));
    t.add_pattern(literal(tok::GROUP_KW, "GROUP", "GROUP"));
    t.add_pattern(literal(tok::MANDATORY_GROUPS_KW, "MANDATORY-GROUPS", "MANDATORY-GROUPS"));
    t.add_pattern(literal(tok::MODULE_KW, "MODULE", "MODULE"));
    t.add_pattern(literal(tok::PRODUCT_RELEASE_KW, "PRODUCT-RELEASE", "PRODUCT-RELEASE"));
    t.add_pattern(literal(tok::SUPPORTS_KW, "SUPPORTS", "SUPPORTS"));
    t.add_pattern(literal(tok::INCLUDES_KW, "INCLUDES", "INCLUDES"));
    t.add_pattern(literal(tok::VARIATION_KW, "VARIATION", "VARIATION"));
    t.add_pattern(literal(tok::REFERENCE_KW, "REFERENCE", "REFERENCE"));
    t.add_pattern(literal(tok::WRITE_SYNTAX_KW, "WRITE-SYNTAX", "WRITE-SYNTAX"));
    t.add_pattern(literal(tok::MIN_ACCESS_KW, "MIN-ACCESS", "MIN-ACCESS"));
    t.add_pattern(literal(tok::DOTDOT, "DOTDOT", ".."));
    t.add_pattern(literal(tok::PIPE, "PIPE", "|"));
    t.add_pattern(TokenPattern::regex(tok::NUMBER, "NUMBER", Regex::compile("[0-9]+", false).unwrap()));
    t.add_pattern(TokenPattern::regex(tok::TYPE_REF, "TYPE-REF", Regex::compile("[A-Z][A-Za-z0-9-]*", false).unwrap()));
    t.add_pattern(TokenPattern::regex(tok::LOWER_ID, "IDENT", Regex::compile("[a-z][A-Za-z0-9-]*", false).unwrap()));
    t.add_pattern(TokenPattern::regex(tok::TEXT, "TEXT", Regex::compile("\"[^\"]*\"", false).unwrap()));
    t.add_pattern(TokenPattern::regex(tok::WS, "WS", Regex::compile(r"[ \t\r\n]+", false).unwrap()).ignored());
    t.add_pattern(TokenPattern::regex(tok::COMMENT, "COMMENT", Regex::compile("--[^\n]*", false).unwrap()).ignored());
    t
}

/// Builds the production table. Callers run this through
/// [`grammatica_core::lookahead::LookAheadAnalyzer`] (or simply
/// `Parser::prepare`) before parsing.
pub fn build_productions() -> IndexMap<ProductionId, ProductionPattern> {
    let mut p = IndexMap::new();
    let mut add = |prod: ProductionPattern| {
        p.insert(prod.id, prod);
    };

    add(ProductionPattern::new(prod::MODULE, "Module").add_alternative(vec![
        Element::token(tok::TYPE_REF),
        Element::token(tok::DEFINITIONS_KW),
        Element::token(tok::ASSIGN),
        Element::token(tok::BEGIN_KW),
        Element::production(prod::IMPORTS).optional(),
        Element::production(prod::ASSIGNMENT).repeated(0, None),
        Element::token(tok::END_KW),
    ]));

    add(ProductionPattern::new(prod::IMPORTS, "Imports").hidden().add_alternative(vec![
        Element::token(tok::IMPORTS_KW),
        Element::production(prod::IMPORT_GROUP).repeated(1, None),
        Element::token(tok::SEMI),
    ]));

    add(ProductionPattern::new(prod::IMPORT_GROUP, "ImportGroup").add_alternative(vec![
        Element::production(prod::IMPORT_SYMBOL),
        Element::production(prod::IMPORT_SYMBOL_TAIL).repeated(0, None),
        Element::token(tok::FROM_KW),
        Element::token(tok::TYPE_REF),
    ]));

    add(ProductionPattern::new(prod::IMPORT_SYMBOL, "ImportSymbol")
        .hidden()
        .add_alternative(vec![Element::token(tok::LOWER_ID)])
        .add_alternative(vec![Element::token(tok::TYPE_REF)]));

    add(ProductionPattern::new(prod::IMPORT_SYMBOL_TAIL, "ImportSymbolTail").hidden().add_alternative(vec![
        Element::token(tok::COMMA),
        Element::production(prod::IMPORT_SYMBOL),
    ]));

    add(ProductionPattern::new(prod::ASSIGNMENT, "Assignment")
        .hidden()
        .add_alternative(vec![Element::production(prod::OID_VALUE_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::MODULE_IDENTITY_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::OBJECT_TYPE_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::OBJECT_IDENTITY_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::NOTIFICATION_TYPE_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::OBJECT_GROUP_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::NOTIFICATION_GROUP_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::MODULE_COMPLIANCE_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::AGENT_CAPABILITIES_ASSIGNMENT)])
        .add_alternative(vec![Element::production(prod::TYPE_ALIAS_ASSIGNMENT)]));

    add(ProductionPattern::new(prod::OID_VALUE_ASSIGNMENT, "OidValueAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::OBJECT_KW),
        Element::token(tok::IDENTIFIER_KW),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::MODULE_IDENTITY_ASSIGNMENT, "ModuleIdentityAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::MODULE_IDENTITY_KW),
        Element::token(tok::LAST_UPDATED_KW),
        Element::token(tok::TEXT),
        Element::token(tok::ORGANIZATION_KW),
        Element::token(tok::TEXT),
        Element::token(tok::CONTACT_INFO_KW),
        Element::token(tok::TEXT),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::OBJECT_TYPE_ASSIGNMENT, "ObjectTypeAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::OBJECT_TYPE_KW),
        Element::token(tok::SYNTAX_KW),
        Element::production(prod::SYNTAX_SPEC),
        Element::production(prod::ACCESS_KEYWORD),
        Element::token(tok::LOWER_ID),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::ACCESS_KEYWORD, "AccessKeyword")
        .hidden()
        .add_alternative(vec![Element::token(tok::MAX_ACCESS_KW)])
        .add_alternative(vec![Element::token(tok::ACCESS_KW)]));

    add(ProductionPattern::new(prod::TYPE_ALIAS_ASSIGNMENT, "TypeAliasAssignment").add_alternative(vec![
        Element::token(tok::TYPE_REF),
        Element::token(tok::ASSIGN),
        Element::production(prod::SYNTAX_SPEC),
    ]));

    add(ProductionPattern::new(prod::SYNTAX_SPEC, "SyntaxSpec")
        .add_alternative(vec![
            Element::token(tok::TYPE_REF),
            Element::production(prod::CONSTRAINT).optional(),
        ])
        .add_alternative(vec![
            Element::token(tok::INTEGER_KW),
            Element::production(prod::NAMED_NUMBER_LIST).optional(),
            Element::production(prod::CONSTRAINT).optional(),
        ])
        .add_alternative(vec![
            Element::token(tok::OCTET_KW),
            Element::token(tok::STRING_KW),
            Element::production(prod::CONSTRAINT).optional(),
        ])
        .add_alternative(vec![Element::token(tok::BITS_KW), Element::production(prod::NAMED_NUMBER_LIST)])
        .add_alternative(vec![Element::token(tok::SEQUENCE_KW), Element::token(tok::OF_KW), Element::token(tok::TYPE_REF)])
        .add_alternative(vec![
            Element::token(tok::SEQUENCE_KW),
            Element::token(tok::LBRACE),
            Element::production(prod::FIELD),
            Element::production(prod::FIELD_TAIL).repeated(0, None),
            Element::token(tok::RBRACE),
        ]));

    add(ProductionPattern::new(prod::FIELD, "Field").hidden().add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::production(prod::SYNTAX_SPEC),
    ]));

    add(ProductionPattern::new(prod::FIELD_TAIL, "FieldTail").hidden().add_alternative(vec![
        Element::token(tok::COMMA),
        Element::production(prod::FIELD),
    ]));

    add(ProductionPattern::new(prod::NAMED_NUMBER_LIST, "NamedNumberList").add_alternative(vec![
        Element::token(tok::LBRACE),
        Element::production(prod::NAMED_NUMBER_ITEM),
        Element::production(prod::NAMED_NUMBER_TAIL).repeated(0, None),
        Element::token(tok::RBRACE),
    ]));

    add(ProductionPattern::new(prod::NAMED_NUMBER_ITEM, "NamedNumberItem").hidden().add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::LPAREN),
        Element::token(tok::NUMBER),
        Element::token(tok::RPAREN),
    ]));

    add(ProductionPattern::new(prod::NAMED_NUMBER_TAIL, "NamedNumberTail").hidden().add_alternative(vec![
        Element::token(tok::COMMA),
        Element::production(prod::NAMED_NUMBER_ITEM),
    ]));

    add(ProductionPattern::new(prod::CONSTRAINT, "Constraint").hidden().add_alternative(vec![
        Element::token(tok::LPAREN),
        Element::production(prod::CONSTRAINT_TERM),
        Element::production(prod::CONSTRAINT_TERM_TAIL).repeated(0, None),
        Element::token(tok::RPAREN),
    ]));

    add(ProductionPattern::new(prod::CONSTRAINT_TERM, "ConstraintTerm").hidden().add_alternative(vec![
        Element::token(tok::NUMBER),
        Element::production(prod::CONSTRAINT_RANGE_TAIL).optional(),
    ]));

    add(ProductionPattern::new(prod::CONSTRAINT_RANGE_TAIL, "ConstraintRangeTail").hidden().add_alternative(vec![
        Element::token(tok::DOTDOT),
        Element::token(tok::NUMBER),
    ]));

    add(ProductionPattern::new(prod::CONSTRAINT_TERM_TAIL, "ConstraintTermTail").hidden().add_alternative(vec![
        Element::token(tok::PIPE),
        Element::production(prod::CONSTRAINT_TERM),
    ]));

    add(ProductionPattern::new(prod::OID_VALUE, "OidValue").add_alternative(vec![
        Element::token(tok::LBRACE),
        Element::production(prod::OID_COMPONENT).repeated(1, None),
        Element::token(tok::RBRACE),
    ]));

    add(ProductionPattern::new(prod::OID_COMPONENT, "OidComponent")
        .add_alternative(vec![Element::token(tok::LOWER_ID), Element::production(prod::NAMED_NUMBER_SUFFIX).optional()])
        .add_alternative(vec![Element::token(tok::NUMBER)]));

    add(ProductionPattern::new(prod::NAMED_NUMBER_SUFFIX, "NamedNumberSuffix").hidden().add_alternative(vec![
        Element::token(tok::LPAREN),
        Element::token(tok::NUMBER),
        Element::token(tok::RPAREN),
    ]));

    add(ProductionPattern::new(prod::REFERENCE_CLAUSE, "ReferenceClause").hidden().add_alternative(vec![
        Element::token(tok::REFERENCE_KW),
        Element::token(tok::TEXT),
    ]));

    add(ProductionPattern::new(prod::DESCRIPTION_CLAUSE, "DescriptionClause").hidden().add_alternative(vec![
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
    ]));

    add(ProductionPattern::new(prod::ID_LIST, "IdList").add_alternative(vec![
        Element::token(tok::LBRACE),
        Element::production(prod::IMPORT_SYMBOL),
        Element::production(prod::IMPORT_SYMBOL_TAIL).repeated(0, None),
        Element::token(tok::RBRACE),
    ]));

    add(ProductionPattern::new(prod::OBJECTS_CLAUSE, "ObjectsClause").hidden().add_alternative(vec![
        Element::token(tok::OBJECTS_KW),
        Element::production(prod::ID_LIST),
    ]));

    add(ProductionPattern::new(prod::NOTIFICATIONS_CLAUSE, "NotificationsClause").hidden().add_alternative(vec![
        Element::token(tok::NOTIFICATIONS_KW),
        Element::production(prod::ID_LIST),
    ]));

    add(ProductionPattern::new(prod::OBJECT_IDENTITY_ASSIGNMENT, "ObjectIdentityAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::OBJECT_IDENTITY_KW),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::production(prod::REFERENCE_CLAUSE).optional(),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::NOTIFICATION_TYPE_ASSIGNMENT, "NotificationTypeAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::NOTIFICATION_TYPE_KW),
        Element::production(prod::OBJECTS_CLAUSE).optional(),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::production(prod::REFERENCE_CLAUSE).optional(),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::OBJECT_GROUP_ASSIGNMENT, "ObjectGroupAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::OBJECT_GROUP_KW),
        Element::production(prod::OBJECTS_CLAUSE),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::production(prod::REFERENCE_CLAUSE).optional(),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::NOTIFICATION_GROUP_ASSIGNMENT, "NotificationGroupAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::NOTIFICATION_GROUP_KW),
        Element::production(prod::NOTIFICATIONS_CLAUSE),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::production(prod::REFERENCE_CLAUSE).optional(),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::SYNTAX_CLAUSE, "SyntaxClause").hidden().add_alternative(vec![
        Element::token(tok::SYNTAX_KW),
        Element::production(prod::SYNTAX_SPEC),
    ]));

    add(ProductionPattern::new(prod::WRITE_SYNTAX_CLAUSE, "WriteSyntaxClause").hidden().add_alternative(vec![
        Element::token(tok::WRITE_SYNTAX_KW),
        Element::production(prod::SYNTAX_SPEC),
    ]));

    add(ProductionPattern::new(prod::MIN_ACCESS_CLAUSE, "MinAccessClause").hidden().add_alternative(vec![
        Element::token(tok::MIN_ACCESS_KW),
        Element::token(tok::LOWER_ID),
    ]));

    add(ProductionPattern::new(prod::COMPLIANCE_ITEM, "ComplianceItem")
        .hidden()
        .add_alternative(vec![
            Element::token(tok::GROUP_KW),
            Element::token(tok::LOWER_ID),
            Element::production(prod::DESCRIPTION_CLAUSE),
        ])
        .add_alternative(vec![
            Element::token(tok::OBJECT_KW),
            Element::token(tok::LOWER_ID),
            Element::production(prod::SYNTAX_CLAUSE).optional(),
            Element::production(prod::WRITE_SYNTAX_CLAUSE).optional(),
            Element::production(prod::MIN_ACCESS_CLAUSE).optional(),
            Element::production(prod::DESCRIPTION_CLAUSE),
        ]));

    add(ProductionPattern::new(prod::MANDATORY_GROUPS_CLAUSE, "MandatoryGroupsClause").hidden().add_alternative(vec![
        Element::token(tok::MANDATORY_GROUPS_KW),
        Element::production(prod::ID_LIST),
    ]));

    add(ProductionPattern::new(prod::COMPLIANCE_MODULE, "ComplianceModule").hidden().add_alternative(vec![
        Element::token(tok::MODULE_KW),
        Element::token(tok::TYPE_REF).optional(),
        Element::production(prod::MANDATORY_GROUPS_CLAUSE).optional(),
        Element::production(prod::COMPLIANCE_ITEM).repeated(0, None),
    ]));

    add(ProductionPattern::new(prod::MODULE_COMPLIANCE_ASSIGNMENT, "ModuleComplianceAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::MODULE_COMPLIANCE_KW),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::production(prod::REFERENCE_CLAUSE).optional(),
        Element::production(prod::COMPLIANCE_MODULE).repeated(1, None),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    add(ProductionPattern::new(prod::VARIATION_CLAUSE, "VariationClause").hidden().add_alternative(vec![
        Element::token(tok::VARIATION_KW),
        Element::token(tok::LOWER_ID),
        Element::production(prod::SYNTAX_CLAUSE).optional(),
        Element::production(prod::WRITE_SYNTAX_CLAUSE).optional(),
        Element::production(prod::MIN_ACCESS_CLAUSE).optional(),
        Element::production(prod::DESCRIPTION_CLAUSE).optional(),
    ]));

    add(ProductionPattern::new(prod::SUPPORTS_CLAUSE, "SupportsClause").hidden().add_alternative(vec![
        Element::token(tok::SUPPORTS_KW),
        Element::token(tok::TYPE_REF),
        Element::token(tok::INCLUDES_KW),
        Element::production(prod::ID_LIST),
        Element::production(prod::VARIATION_CLAUSE).repeated(0, None),
    ]));

    add(ProductionPattern::new(prod::AGENT_CAPABILITIES_ASSIGNMENT, "AgentCapabilitiesAssignment").add_alternative(vec![
        Element::token(tok::LOWER_ID),
        Element::token(tok::AGENT_CAPABILITIES_KW),
        Element::token(tok::PRODUCT_RELEASE_KW),
        Element::token(tok::TEXT),
        Element::token(tok::STATUS_KW),
        Element::token(tok::LOWER_ID),
        Element::token(tok::DESCRIPTION_KW),
        Element::token(tok::TEXT),
        Element::production(prod::REFERENCE_CLAUSE).optional(),
        Element::production(prod::SUPPORTS_CLAUSE).repeated(0, None),
        Element::token(tok::ASSIGN),
        Element::production(prod::OID_VALUE),
    ]));

    p
}
