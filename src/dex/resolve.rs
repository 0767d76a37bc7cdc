//! Human-readable views composed from the identifier tables.
//!
//! Each call here is a chain of table lookups. Errors from the underlying
//! lookups are returned as-is.

use serde::Serialize;

use crate::dex::access::AccessFlags;
use crate::dex::dex_file::DexFile;
use crate::dex::error::DexResult;
use crate::dex::tables::{FieldIdx, MethodIdx, TypeIdx};
use crate::types::TypeSignature;

/// A resolved `method_id_item`. Types are raw descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature
{
    pub declaring_type: String,
    pub name: String,
    pub shorty: String,
    pub return_type: String,
    pub parameter_types: Vec<String>,
}

impl MethodSignature
{
    /// `(params)ret`, e.g. `(ILjava/lang/String;)V`.
    pub fn descriptor(&self) -> String
    {
        let mut s = String::from("(");
        for p in &self.parameter_types
        {
            s.push_str(p);
        }
        s.push(')');
        s.push_str(&self.return_type);
        s
    }

    /// Java-style declaration such as `void run(int, java.lang.String)`.
    pub fn to_java(&self) -> DexResult<String>
    {
        let params = self
            .parameter_types
            .iter()
            .map(|p| TypeSignature::from_descriptor(p).map(|t| t.to_java()))
            .collect::<DexResult<Vec<_>>>()?;
        let ret = TypeSignature::from_descriptor(&self.return_type)?.to_java();
        Ok(format!("{} {}({})", ret, self.name, params.join(", ")))
    }
}

/// A resolved `field_id_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor
{
    pub declaring_type: String,
    pub name: String,
    pub type_descriptor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassField
{
    pub field: FieldDescriptor,
    pub access_flags: AccessFlags,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassMethod
{
    pub method: MethodSignature,
    pub access_flags: AccessFlags,
    pub code_off: Option<u32>,
    pub is_virtual: bool,
}

/// Everything about one class definition that can be named without
/// decoding bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassSummary
{
    pub descriptor: String,
    pub access_flags: AccessFlags,
    pub superclass: Option<String>,
    pub source_file: Option<String>,
    pub interfaces: Vec<String>,
    /// Static fields first, then instance fields.
    pub fields: Vec<ClassField>,
    /// Direct methods first, then virtual methods.
    pub methods: Vec<ClassMethod>,
}

impl DexFile
{
    pub fn type_descriptor(&self, type_idx: TypeIdx) -> DexResult<String>
    {
        let type_id = self.types().get(type_idx)?;
        self.string(type_id.descriptor_idx)
    }

    pub fn method_signature(&self, method_idx: MethodIdx) -> DexResult<MethodSignature>
    {
        let method = self.methods().get(method_idx)?;
        let proto = self.protos().get(method.proto_idx as u32)?;
        let parameter_types = self
            .type_list(proto.parameters_off)?
            .iter()
            .map(|t| self.type_descriptor(t))
            .collect::<DexResult<Vec<_>>>()?;

        Ok(MethodSignature {
            declaring_type: self.type_descriptor(method.class_idx as u32)?,
            name: self.string(method.name_idx)?,
            shorty: self.string(proto.shorty_idx)?,
            return_type: self.type_descriptor(proto.return_type_idx)?,
            parameter_types,
        })
    }

    pub fn field_descriptor(&self, field_idx: FieldIdx) -> DexResult<FieldDescriptor>
    {
        let field = self.fields().get(field_idx)?;
        Ok(FieldDescriptor {
            declaring_type: self.type_descriptor(field.class_idx as u32)?,
            name: self.string(field.name_idx)?,
            type_descriptor: self.type_descriptor(field.type_idx as u32)?,
        })
    }

    pub fn class_summary(&self, class_idx: u32) -> DexResult<ClassSummary>
    {
        let def = self.class_defs().get(class_idx)?;
        let class_data = self.class_data(&def)?;

        let superclass = def.superclass().map(|t| self.type_descriptor(t)).transpose()?;
        let source_file = def.source_file().map(|s| self.string(s)).transpose()?;
        let interfaces = self
            .type_list(def.interfaces_off)?
            .iter()
            .map(|t| self.type_descriptor(t))
            .collect::<DexResult<Vec<_>>>()?;

        let mut fields = Vec::with_capacity(class_data.static_fields.len() + class_data.instance_fields.len());
        for (list, is_static) in [(&class_data.static_fields, true), (&class_data.instance_fields, false)]
        {
            for f in list
            {
                fields.push(ClassField { field: self.field_descriptor(f.field_idx)?, access_flags: f.access_flags, is_static });
            }
        }

        let mut methods = Vec::with_capacity(class_data.direct_methods.len() + class_data.virtual_methods.len());
        for (list, is_virtual) in [(&class_data.direct_methods, false), (&class_data.virtual_methods, true)]
        {
            for m in list
            {
                methods.push(ClassMethod {
                    method: self.method_signature(m.method_idx)?,
                    access_flags: m.access_flags,
                    code_off: m.code_off(),
                    is_virtual,
                });
            }
        }

        Ok(ClassSummary {
            descriptor: self.type_descriptor(def.class_idx)?,
            access_flags: def.access_flags,
            superclass,
            source_file,
            interfaces,
            fields,
            methods,
        })
    }

    /// Summaries of every class definition, in table order.
    pub fn class_summaries(&self) -> impl Iterator<Item = DexResult<ClassSummary>> + '_
    {
        (0..self.class_defs().len()).map(move |i| self.class_summary(i))
    }
}
