use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// `access_flags` of classes, fields and methods.
    ///
    /// Some bits mean different things depending on what they are attached
    /// to (0x40 is `volatile` on a field and `bridge` on a method), so use
    /// [`AccessFlags::modifiers`] rather than the flag names for display.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    pub struct AccessFlags: u32 {
        const PUBLIC = 0x1;
        const PRIVATE = 0x2;
        const PROTECTED = 0x4;
        const STATIC = 0x8;
        const FINAL = 0x10;
        const SYNCHRONIZED = 0x20;
        const VOLATILE = 0x40;
        const BRIDGE = 0x40;
        const TRANSIENT = 0x80;
        const VARARGS = 0x80;
        const NATIVE = 0x100;
        const INTERFACE = 0x200;
        const ABSTRACT = 0x400;
        const STRICT = 0x800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const CONSTRUCTOR = 0x10000;
        const DECLARED_SYNCHRONIZED = 0x20000;
    }
}

/// What an access flag set is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind
{
    Class,
    Field,
    Method,
}

const CLASS_MODIFIERS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::PRIVATE, "private"),
    (AccessFlags::PROTECTED, "protected"),
    (AccessFlags::STATIC, "static"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::INTERFACE, "interface"),
    (AccessFlags::ABSTRACT, "abstract"),
    (AccessFlags::SYNTHETIC, "synthetic"),
    (AccessFlags::ANNOTATION, "annotation"),
    (AccessFlags::ENUM, "enum"),
];

const FIELD_MODIFIERS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::PRIVATE, "private"),
    (AccessFlags::PROTECTED, "protected"),
    (AccessFlags::STATIC, "static"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::VOLATILE, "volatile"),
    (AccessFlags::TRANSIENT, "transient"),
    (AccessFlags::SYNTHETIC, "synthetic"),
    (AccessFlags::ENUM, "enum"),
];

const METHOD_MODIFIERS: &[(AccessFlags, &str)] = &[
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::PRIVATE, "private"),
    (AccessFlags::PROTECTED, "protected"),
    (AccessFlags::STATIC, "static"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::SYNCHRONIZED, "synchronized"),
    (AccessFlags::BRIDGE, "bridge"),
    (AccessFlags::VARARGS, "varargs"),
    (AccessFlags::NATIVE, "native"),
    (AccessFlags::ABSTRACT, "abstract"),
    (AccessFlags::STRICT, "strictfp"),
    (AccessFlags::SYNTHETIC, "synthetic"),
    (AccessFlags::CONSTRUCTOR, "constructor"),
    (AccessFlags::DECLARED_SYNCHRONIZED, "declared-synchronized"),
];

impl AccessFlags
{
    /// Keep unknown bits rather than dropping them; they are still reported
    /// through [`AccessFlags::bits`].
    pub fn from_raw(raw: u32) -> Self
    {
        AccessFlags::from_bits_retain(raw)
    }

    /// Modifier keywords for the flags that are meaningful on `kind`, in
    /// declaration order.
    pub fn modifiers(&self, kind: MemberKind) -> Vec<&'static str>
    {
        let table = match kind
        {
            MemberKind::Class => CLASS_MODIFIERS,
            MemberKind::Field => FIELD_MODIFIERS,
            MemberKind::Method => METHOD_MODIFIERS,
        };
        table.iter().filter(|(flag, _)| self.contains(*flag)).map(|(_, name)| *name).collect()
    }
}
