//! The type model: classes, protocols, methods, and the predefined
//! bootstrap.

use smol_str::SmolStr;

/// Types are identified by interned name; vector types derive a
/// canonical `"[T]"` name from their element type.
pub type TypeName = SmolStr;

pub const OBJECT: &str = "Object";
pub const NUMBER: &str = "Number";
pub const STRING: &str = "String";
pub const BOOLEAN: &str = "Boolean";
pub const RANGE: &str = "Range";

/// Absorbing error type of the inference lattice.
pub const ERROR: &str = "Error";
/// Marker carried by vector literal nodes until their element type is
/// inferred.
pub const VECTOR: &str = "Vector";

/// Canonical name of the vector type over `element`.
pub fn vector_of(element: &str) -> TypeName {
    SmolStr::new(format!("[{element}]"))
}

/// Whether `name` denotes a vector type.
pub fn is_vector(name: &str) -> bool {
    name.starts_with('[') && name.ends_with(']')
}

/// A named slot: a class attribute or a method parameter. The type is
/// `None` until an annotation resolves it or inference fills it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: SmolStr,
    pub ty: Option<TypeName>,
}

impl Attribute {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            ty: Some(SmolStr::new(ty)),
        }
    }

    pub fn untyped(name: &str, ty: Option<TypeName>) -> Self {
        Self {
            name: SmolStr::new(name),
            ty,
        }
    }
}

/// A method or free-function signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: SmolStr,
    pub return_type: Option<TypeName>,
    pub parameters: Vec<Attribute>,
}

impl Method {
    pub fn new(name: &str, return_type: &str, parameters: Vec<Attribute>) -> Self {
        Self {
            name: SmolStr::new(name),
            return_type: Some(SmolStr::new(return_type)),
            parameters,
        }
    }

    pub fn untyped(
        name: &str,
        return_type: Option<TypeName>,
        parameters: Vec<Attribute>,
    ) -> Self {
        Self {
            name: SmolStr::new(name),
            return_type,
            parameters,
        }
    }
}

/// A nominal class: single optional parent, constructor parameters,
/// attributes, methods, and the protocols it implements structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub name: TypeName,
    pub parent: Option<TypeName>,
    pub parameters: Vec<Attribute>,
    pub attributes: Vec<Attribute>,
    pub methods: Vec<Method>,
    pub protocols: Vec<TypeName>,
}

impl Class {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            parent: None,
            parameters: Vec::new(),
            attributes: Vec::new(),
            methods: Vec::new(),
            protocols: Vec::new(),
        }
    }

    pub fn with_parent(name: &str, parent: &str) -> Self {
        let mut class = Self::new(name);
        class.parent = Some(SmolStr::new(parent));
        class
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A structural protocol: methods plus an optional parent protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protocol {
    pub name: TypeName,
    pub parent: Option<TypeName>,
    pub methods: Vec<Method>,
}

impl Protocol {
    pub fn new(name: &str) -> Self {
        Self {
            name: SmolStr::new(name),
            parent: None,
            methods: Vec::new(),
        }
    }

    pub fn method(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// The predefined classes every program starts from.
pub fn predefined_classes() -> Vec<Class> {
    let object = Class::new(OBJECT);
    let number = Class::with_parent(NUMBER, OBJECT);
    let string = Class::with_parent(STRING, OBJECT);
    let boolean = Class::with_parent(BOOLEAN, OBJECT);

    let mut range = Class::with_parent(RANGE, OBJECT);
    range.parameters = vec![Attribute::new("min", NUMBER), Attribute::new("max", NUMBER)];
    range.methods = vec![
        Method::new("init", RANGE, range.parameters.clone()),
        Method::new("current", NUMBER, Vec::new()),
        Method::new("next", BOOLEAN, Vec::new()),
    ];

    vec![object, number, string, boolean, range]
}

/// The predefined protocols.
pub fn predefined_protocols() -> Vec<Protocol> {
    let mut iterable = Protocol::new("Iterable");
    iterable.methods = vec![
        Method::new("current", OBJECT, Vec::new()),
        Method::new("next", BOOLEAN, Vec::new()),
    ];
    vec![iterable]
}

/// The predefined free functions.
pub fn predefined_methods() -> Vec<Method> {
    vec![
        Method::new("print", STRING, vec![Attribute::new("value", OBJECT)]),
        Method::new("sqrt", NUMBER, vec![Attribute::new("value", NUMBER)]),
        Method::new("sin", NUMBER, vec![Attribute::new("angle", NUMBER)]),
        Method::new("cos", NUMBER, vec![Attribute::new("angle", NUMBER)]),
        Method::new("exp", NUMBER, vec![Attribute::new("value", NUMBER)]),
        Method::new(
            "log",
            NUMBER,
            vec![Attribute::new("base", NUMBER), Attribute::new("value", NUMBER)],
        ),
        Method::new("rand", NUMBER, Vec::new()),
        Method::new(
            "range",
            RANGE,
            vec![Attribute::new("min", NUMBER), Attribute::new("max", NUMBER)],
        ),
        Method::new("parse", NUMBER, vec![Attribute::new("text", STRING)]),
    ]
}

/// Methods every vector type `[T]` carries.
pub fn vector_methods(element: &str) -> Vec<Method> {
    vec![
        Method::new("current", element, Vec::new()),
        Method::new("next", BOOLEAN, Vec::new()),
        Method::new("get", element, vec![Attribute::new("index", NUMBER)]),
        Method::new(
            "set",
            element,
            vec![
                Attribute::new("index", NUMBER),
                Attribute::new("value", element),
            ],
        ),
        Method::new("size", NUMBER, Vec::new()),
    ]
}
