//! Declaration and type modifier keywords.

use bitflags::bitflags;

bitflags! {
    /// Set of modifier keywords.
    ///
    /// Used both for the raw keywords on a syntax node and for the modifier
    /// set the symbol model reports. `COMPANION` only appears in syntax;
    /// `JAVA_STATIC` only in reported sets.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Modifiers: u64 {
        // === Visibility (bits 0-3) ===
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const INTERNAL = 1 << 2;
        const PROTECTED = 1 << 3;

        // === Variance (bits 4-5) ===
        const IN = 1 << 4;
        const OUT = 1 << 5;

        // === Class and member (bits 6-21) ===
        const OVERRIDE = 1 << 6;
        const LATEINIT = 1 << 7;
        const ENUM = 1 << 8;
        const SEALED = 1 << 9;
        const ANNOTATION = 1 << 10;
        const DATA = 1 << 11;
        const INNER = 1 << 12;
        const FUN = 1 << 13;
        const VALUE = 1 << 14;
        const SUSPEND = 1 << 15;
        const TAILREC = 1 << 16;
        const OPERATOR = 1 << 17;
        const INFIX = 1 << 18;
        const INLINE = 1 << 19;
        const EXTERNAL = 1 << 20;
        const CONST = 1 << 21;

        // === Modality (bits 22-24) ===
        const ABSTRACT = 1 << 22;
        const FINAL = 1 << 23;
        const OPEN = 1 << 24;

        // === Parameters (bits 25-28) ===
        const VARARG = 1 << 25;
        const NOINLINE = 1 << 26;
        const CROSSINLINE = 1 << 27;
        const REIFIED = 1 << 28;

        // === Multiplatform (bits 29-30) ===
        const EXPECT = 1 << 29;
        const ACTUAL = 1 << 30;

        // === Syntax only (bit 31) ===
        const COMPANION = 1 << 31;

        // === Model only (bit 32) ===
        /// Member annotated `@JvmStatic`.
        const JAVA_STATIC = 1 << 32;
    }
}

impl Modifiers {
    /// Parse one keyword as written in source.
    pub fn from_keyword(keyword: &str) -> Option<Modifiers> {
        let flag = match keyword {
            "public" => Modifiers::PUBLIC,
            "private" => Modifiers::PRIVATE,
            "internal" => Modifiers::INTERNAL,
            "protected" => Modifiers::PROTECTED,
            "in" => Modifiers::IN,
            "out" => Modifiers::OUT,
            "override" => Modifiers::OVERRIDE,
            "lateinit" => Modifiers::LATEINIT,
            "enum" => Modifiers::ENUM,
            "sealed" => Modifiers::SEALED,
            "annotation" => Modifiers::ANNOTATION,
            "data" => Modifiers::DATA,
            "inner" => Modifiers::INNER,
            "fun" => Modifiers::FUN,
            "value" => Modifiers::VALUE,
            "suspend" => Modifiers::SUSPEND,
            "tailrec" => Modifiers::TAILREC,
            "operator" => Modifiers::OPERATOR,
            "infix" => Modifiers::INFIX,
            "inline" => Modifiers::INLINE,
            "external" => Modifiers::EXTERNAL,
            "const" => Modifiers::CONST,
            "abstract" => Modifiers::ABSTRACT,
            "final" => Modifiers::FINAL,
            "open" => Modifiers::OPEN,
            "vararg" => Modifiers::VARARG,
            "noinline" => Modifiers::NOINLINE,
            "crossinline" => Modifiers::CROSSINLINE,
            "reified" => Modifiers::REIFIED,
            "expect" => Modifiers::EXPECT,
            "actual" => Modifiers::ACTUAL,
            "companion" => Modifiers::COMPANION,
            _ => return None,
        };
        Some(flag)
    }

    /// Parse a whitespace-separated keyword list, ignoring unknown words.
    pub fn parse(keywords: &str) -> Modifiers {
        keywords
            .split_whitespace()
            .filter_map(Modifiers::from_keyword)
            .fold(Modifiers::empty(), |acc, m| acc | m)
    }

    /// Any of the four visibility keywords.
    pub const VISIBILITY: Modifiers = Modifiers::PUBLIC
        .union(Modifiers::PRIVATE)
        .union(Modifiers::INTERNAL)
        .union(Modifiers::PROTECTED);
}
