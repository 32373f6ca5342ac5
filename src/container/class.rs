use serde::Deserialize;

/// Reference to a type as it appears in a field or method signature.
///
/// Deserializes from a plain type name; serializability is filled in once the whole
/// class table is known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct TypeRef {
    pub name: String,
    pub serializable: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serializable: false,
        }
    }

    pub fn serializable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serializable: true,
        }
    }

    /// `true` for the primitive keywords, which never need reflection or serialization hints.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self.name.as_str(),
            "boolean" | "byte" | "char" | "short" | "int" | "long" | "float" | "double" | "void"
        )
    }

    /// The name without type arguments, as used in class literals and casts
    pub fn erasure(&self) -> &str {
        self.name
            .split_once('<')
            .map(|(raw, _)| raw.trim_end())
            .unwrap_or(self.name.as_str())
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        TypeRef::new(name)
    }
}

/// Member visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

/// Whether a class can be instantiated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Concrete,
    Interface,
}

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: TypeRef,
}

impl FieldInfo {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// A method known to the container, identified by owning class, name and parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodDescriptor {
    /// Owning class; filled from the enclosing class when loaded from a descriptor
    #[serde(default, rename = "class")]
    pub declaring_class: String,
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// Return type, `None` for `void`
    #[serde(default)]
    pub returns: Option<TypeRef>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "final")]
    pub is_final: bool,
}

impl MethodDescriptor {
    /// Public, non-static, `void` method without parameters
    pub fn new(declaring_class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            declaring_class: declaring_class.into(),
            name: name.into(),
            parameters: Vec::new(),
            returns: None,
            visibility: Visibility::Public,
            is_static: false,
            is_final: false,
        }
    }

    pub fn with_parameter(mut self, parameter: TypeRef) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return(mut self, returns: TypeRef) -> Self {
        self.returns = Some(returns);
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn parameter_type_names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// `name(T1,T2)`, unique within the declaring class
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.parameter_type_names().join(","))
    }

    /// Whether a generated subclass may override this method
    pub fn is_overridable(&self) -> bool {
        !self.is_static && !self.is_final && self.visibility != Visibility::Private
    }
}

/// Shape of a class as the extractor sees it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassInfo {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default, rename = "final")]
    pub is_final: bool,
    #[serde(default)]
    pub serializable: bool,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl ClassInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            is_final: false,
            serializable: false,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::new(name)
        }
    }

    pub fn with_field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a method; its declaring class is forced to this class.
    pub fn with_method(mut self, mut method: MethodDescriptor) -> Self {
        method.declaring_class = self.name.clone();
        self.methods.push(method);
        self
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Package part of the name, empty for the default package
    pub fn package_name(&self) -> &str {
        self.name.rsplit_once('.').map(|(p, _)| p).unwrap_or("")
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit_once('.').map(|(_, s)| s).unwrap_or(&self.name)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}
