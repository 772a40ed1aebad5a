use bitflags::bitflags;

bitflags! {
    /// Access and property flags shared by classes, fields and methods. Some bits mean different
    /// things depending on where they appear, hence the aliases.
    pub struct AccessFlags: u16 {
        const PUBLIC = 0x0001;
        const PRIVATE = 0x0002;
        const PROTECTED = 0x0004;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
        const SYNCHRONIZED = 0x0020;
        const SUPER = 0x0020;
        const VOLATILE = 0x0040;
        const BRIDGE = 0x0040;
        const TRANSIENT = 0x0080;
        const VARARGS = 0x0080;
        const NATIVE = 0x0100;
        const INTERFACE = 0x0200;
        const ABSTRACT = 0x0400;
        const STRICT = 0x0800;
        const SYNTHETIC = 0x1000;
        const ANNOTATION = 0x2000;
        const ENUM = 0x4000;
        const MODULE = 0x8000;
    }
}

const KEYWORDS: [(AccessFlags, &str); 11] = [
    (AccessFlags::PUBLIC, "public"),
    (AccessFlags::PRIVATE, "private"),
    (AccessFlags::PROTECTED, "protected"),
    (AccessFlags::STATIC, "static"),
    (AccessFlags::FINAL, "final"),
    (AccessFlags::SYNCHRONIZED, "synchronized"),
    (AccessFlags::VOLATILE, "volatile"),
    (AccessFlags::TRANSIENT, "transient"),
    (AccessFlags::NATIVE, "native"),
    (AccessFlags::INTERFACE, "interface"),
    (AccessFlags::ABSTRACT, "abstract"),
];

impl AccessFlags {
    /// Renders the flags as source keywords, each followed by a space, always in the same order.
    ///
    /// ```
    /// use jdecode_class_file::AccessFlags;
    ///
    /// let flags = AccessFlags::FINAL | AccessFlags::STATIC | AccessFlags::PUBLIC;
    /// assert_eq!("public static final ", flags.to_keywords());
    /// ```
    pub fn to_keywords(self) -> String {
        KEYWORDS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .fold(String::new(), |mut text, (_, keyword)| {
                text.push_str(keyword);
                text.push(' ');
                text
            })
    }
}
