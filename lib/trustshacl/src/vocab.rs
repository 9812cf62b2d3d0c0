//! Provides ready to use [`NamedNodeRef`](oxrdf::NamedNodeRef)s for the vocabularies the validator reads.

pub mod sh {
    //! [SHACL](https://www.w3.org/TR/shacl/) vocabulary.
    use oxrdf::NamedNodeRef;

    const fn iri(value: &'static str) -> NamedNodeRef<'static> {
        NamedNodeRef::new_unchecked(value)
    }

    // Shapes and targets
    pub const NODE_SHAPE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#NodeShape");
    pub const PROPERTY_SHAPE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#PropertyShape");
    pub const SHAPE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#Shape");
    pub const PROPERTY: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#property");
    pub const PATH: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#path");
    pub const TARGET_CLASS: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#targetClass");
    pub const TARGET_NODE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#targetNode");
    pub const TARGET_SUBJECTS_OF: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#targetSubjectsOf");
    pub const TARGET_OBJECTS_OF: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#targetObjectsOf");

    // Paths
    pub const ALTERNATIVE_PATH: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#alternativePath");
    pub const INVERSE_PATH: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#inversePath");
    pub const ZERO_OR_MORE_PATH: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#zeroOrMorePath");
    pub const ONE_OR_MORE_PATH: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#oneOrMorePath");
    pub const ZERO_OR_ONE_PATH: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#zeroOrOnePath");

    // Constraint parameters
    pub const CLASS: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#class");
    pub const DATATYPE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#datatype");
    pub const NODE_KIND: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#nodeKind");
    pub const MIN_COUNT: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#minCount");
    pub const MAX_COUNT: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#maxCount");
    pub const MIN_EXCLUSIVE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#minExclusive");
    pub const MIN_INCLUSIVE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#minInclusive");
    pub const MAX_EXCLUSIVE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#maxExclusive");
    pub const MAX_INCLUSIVE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#maxInclusive");
    pub const MIN_LENGTH: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#minLength");
    pub const MAX_LENGTH: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#maxLength");
    pub const PATTERN: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#pattern");
    pub const FLAGS: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#flags");
    pub const LANGUAGE_IN: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#languageIn");
    pub const UNIQUE_LANG: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#uniqueLang");
    pub const EQUALS: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#equals");
    pub const DISJOINT: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#disjoint");
    pub const LESS_THAN: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#lessThan");
    pub const LESS_THAN_OR_EQUALS: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#lessThanOrEquals");
    pub const NOT: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#not");
    pub const AND: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#and");
    pub const OR: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#or");
    pub const XONE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#xone");
    pub const NODE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#node");
    pub const HAS_VALUE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#hasValue");
    pub const IN: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#in");
    pub const CLOSED: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#closed");
    pub const IGNORED_PROPERTIES: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#ignoredProperties");

    // Node kinds
    pub const IRI: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#IRI");
    pub const LITERAL: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#Literal");
    pub const BLANK_NODE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#BlankNode");
    pub const BLANK_NODE_OR_IRI: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#BlankNodeOrIRI");
    pub const BLANK_NODE_OR_LITERAL: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#BlankNodeOrLiteral");
    pub const IRI_OR_LITERAL: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#IRIOrLiteral");

    // Shape metadata
    pub const DEACTIVATED: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#deactivated");
    pub const MESSAGE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#message");
    pub const SEVERITY: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#severity");
    pub const VIOLATION: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#Violation");
    pub const WARNING: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#Warning");
    pub const INFO: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#Info");

    // Validation report
    pub const VALIDATION_REPORT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#ValidationReport");
    pub const VALIDATION_RESULT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#ValidationResult");
    pub const CONFORMS: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#conforms");
    pub const RESULT: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#result");
    pub const FOCUS_NODE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#focusNode");
    pub const RESULT_PATH: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#resultPath");
    pub const VALUE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#value");
    pub const SOURCE_SHAPE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#sourceShape");
    pub const SOURCE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#sourceConstraintComponent");
    pub const RESULT_MESSAGE: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#resultMessage");
    pub const RESULT_SEVERITY: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#resultSeverity");
    pub const DETAIL: NamedNodeRef<'_> = iri("http://www.w3.org/ns/shacl#detail");

    // Constraint components
    pub const CLASS_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#ClassConstraintComponent");
    pub const DATATYPE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#DatatypeConstraintComponent");
    pub const NODE_KIND_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#NodeKindConstraintComponent");
    pub const MIN_COUNT_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MinCountConstraintComponent");
    pub const MAX_COUNT_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MaxCountConstraintComponent");
    pub const MIN_EXCLUSIVE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MinExclusiveConstraintComponent");
    pub const MIN_INCLUSIVE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MinInclusiveConstraintComponent");
    pub const MAX_EXCLUSIVE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MaxExclusiveConstraintComponent");
    pub const MAX_INCLUSIVE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MaxInclusiveConstraintComponent");
    pub const MIN_LENGTH_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MinLengthConstraintComponent");
    pub const MAX_LENGTH_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#MaxLengthConstraintComponent");
    pub const PATTERN_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#PatternConstraintComponent");
    pub const LANGUAGE_IN_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#LanguageInConstraintComponent");
    pub const UNIQUE_LANG_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#UniqueLangConstraintComponent");
    pub const EQUALS_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#EqualsConstraintComponent");
    pub const DISJOINT_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#DisjointConstraintComponent");
    pub const LESS_THAN_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#LessThanConstraintComponent");
    pub const LESS_THAN_OR_EQUALS_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#LessThanOrEqualsConstraintComponent");
    pub const NOT_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#NotConstraintComponent");
    pub const AND_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#AndConstraintComponent");
    pub const OR_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#OrConstraintComponent");
    pub const XONE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#XoneConstraintComponent");
    pub const NODE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#NodeConstraintComponent");
    pub const PROPERTY_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#PropertyConstraintComponent");
    pub const HAS_VALUE_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#HasValueConstraintComponent");
    pub const IN_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#InConstraintComponent");
    pub const CLOSED_CONSTRAINT_COMPONENT: NamedNodeRef<'_> =
        iri("http://www.w3.org/ns/shacl#ClosedConstraintComponent");
}

pub mod cred {
    //! [Verifiable Credentials Data Model v1](https://www.w3.org/2018/credentials) vocabulary.
    use oxrdf::NamedNodeRef;

    /// The generic presentation wrapper type.
    pub const VERIFIABLE_PRESENTATION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://www.w3.org/2018/credentials#VerifiablePresentation");
    /// The generic credential wrapper type.
    pub const VERIFIABLE_CREDENTIAL: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://www.w3.org/2018/credentials#VerifiableCredential");
}

pub mod sec {
    //! [Security vocabulary](https://w3id.org/security) terms.
    use oxrdf::NamedNodeRef;

    /// The proof type produced by JSON Web Signature 2020 suites.
    pub const JSON_WEB_SIGNATURE_2020: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("https://w3id.org/security#JsonWebSignature2020");
}
