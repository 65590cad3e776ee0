// ─── Internal helper: PluginMetadata builder ──────────────────────────────────
//
// Used exclusively by `define_plugin!`.  Not part of the public API.

/// Internal helper macro: builds a [`PluginMetadata`] from optional overrides.
///
/// # Internal calling convention
///
/// ```text
/// __wren_plugin_metadata!(
///     @parse [$doc?]      ← captured doc literal
///            key: val, …  ← raw metadata tokens
/// )
/// ```
///
/// [`PluginMetadata`]: crate::plugin::PluginMetadata
#[macro_export]
#[doc(hidden)]
macro_rules! __wren_plugin_metadata {
    (@parse [$($doc:expr)?] $($meta:tt)*) => {
        $crate::__wren_plugin_metadata!(
            @pm [$($doc)?] [] [] []
            :: $($meta)*
        )
    };

    // TT-muncher: skip leading comma
    (@pm $doc:tt $ver:tt $dsc:tt $fd:tt :: , $($rest:tt)*) => {
        $crate::__wren_plugin_metadata!(@pm $doc $ver $dsc $fd :: $($rest)*)
    };

    (@pm $doc:tt [$($old:expr)?] $dsc:tt $fd:tt :: version : $v:literal $($rest:tt)*) => {
        $crate::__wren_plugin_metadata!(@pm $doc [$v] $dsc $fd :: $($rest)*)
    };

    (@pm $doc:tt $ver:tt [$($old:expr)?] $fd:tt :: desc : $v:literal $($rest:tt)*) => {
        $crate::__wren_plugin_metadata!(@pm $doc $ver [$v] $fd :: $($rest)*)
    };

    (@pm $doc:tt $ver:tt $dsc:tt [$($old:expr)?] :: full_desc : $v:literal $($rest:tt)*) => {
        $crate::__wren_plugin_metadata!(@pm $doc $ver $dsc [$v] :: $($rest)*)
    };

    // End of tokens → emit
    (@pm $doc:tt $ver:tt $dsc:tt $fd:tt ::) => {
        $crate::plugin::PluginMetadata {
            version:   $crate::__wren_plugin_metadata!(@get_ver $ver),
            desc:      $crate::__wren_plugin_metadata!(@get_dsc $dsc),
            full_desc: $crate::__wren_plugin_metadata!(@get_fd $fd $doc),
        }
    };

    (@get_ver []) => { ::std::env!("CARGO_PKG_VERSION") };
    (@get_ver [$ver:expr]) => { $ver };

    (@get_dsc []) => { ::std::env!("CARGO_PKG_DESCRIPTION") };
    (@get_dsc [$dsc:expr]) => { $dsc };

    // explicit > doc > None
    (@get_fd [$fd:expr] $_doc:tt) => { ::std::option::Option::Some($fd) };
    (@get_fd [] [$doc:expr]) => { ::std::option::Option::Some($doc) };
    (@get_fd [] []) => { ::std::option::Option::None };
}

// ─── define_plugin! ──────────────────────────────────────────────────────────

/// Creates a [`PluginDescriptor`], the static `Copy` handle to a plugin.
///
/// # Syntax
///
/// ```rust,ignore
/// use wren::prelude::*;
///
/// /// Leaves messages for people who are away.
/// pub static TELL: PluginDescriptor = define_plugin! {
///     name: "tell",
///
///     items: [
///         handler("tell").command("tell").rate(30).callable(tell),
///         handler("deliver").rule(".*").priority(Priority::Low).callable(deliver),
///         shutdown().callable(flush),
///         value("MAX_PENDING"),
///     ],
///
///     metadata: {
///         version: "2.0.0",
///         desc:    "Message relay.",
///     },
/// };
/// ```
///
/// ## Field reference
///
/// | Field | Required | Description |
/// |-------|----------|-------------|
/// | `name` | ✓ | Must be **first**. Plugin name and enable/exclude key. |
/// | `items` | | `[expr, …]`, anything `Into<PluginItem>`, in declaration order |
/// | `metadata` | | `{ version, desc, full_desc }` |
///
/// `items` may appear more than once; later lists are appended.
///
/// [`PluginDescriptor`]: crate::plugin::PluginDescriptor
#[macro_export]
macro_rules! define_plugin {
    // ── Entry: with doc comment ───────────────────────────────────────────────
    //
    // Accumulator slots:
    //   [$n]         plugin name literal
    //   [$($i),*]    item expressions
    //   [$($doc)?]   doc literal
    ($(#[doc = $doc:literal])+ name: $name:literal, $($tail:tt)+) => {
        $crate::define_plugin!(
            @acc [$name] [] [::std::concat!($($doc, " "),*)]
            $($tail)+
        )
    };

    ($(#[doc = $doc:literal])+ name: $name:literal $(,)?) => {
        $crate::define_plugin!(
            @acc [$name] [] [::std::concat!($($doc, " "),*)]
        )
    };

    // ── Entry: no doc + more fields ───────────────────────────────────────────
    (name: $name:literal, $($tail:tt)+) => {
        $crate::define_plugin!(@acc [$name] [] [] $($tail)+)
    };

    // ── Entry: name only ──────────────────────────────────────────────────────
    (name: $name:literal $(,)?) => {
        $crate::define_plugin!(@acc [$name] [] [])
    };

    // ── Accumulator: skip stray commas ────────────────────────────────────────
    (@acc $n:tt $i:tt $doc:tt , $($rest:tt)*) => {
        $crate::define_plugin!(@acc $n $i $doc $($rest)*)
    };

    // ── Consume items: [expr, …] ──────────────────────────────────────────────
    (
        @acc [$n:literal] [$($i:expr),* $(,)?] $doc:tt
        items: [$($ni:expr),* $(,)?] $($rest:tt)*
    ) => {
        $crate::define_plugin!(@acc [$n] [$($i,)* $($ni),*] $doc $($rest)*)
    };

    // ── Consume metadata: { … } ───────────────────────────────────────────────
    (
        @acc [$n:literal] [$($i:expr),* $(,)?] [$($doc:expr)?]
        metadata: { $($meta:tt)* } $(,)?
    ) => {
        $crate::define_plugin!(@terminal [$n] [$($i),*] [$($doc)?] $($meta)*)
    };

    // ── No remaining fields → terminal ────────────────────────────────────────
    (@acc [$n:literal] [$($i:expr),* $(,)?] [$($doc:expr)?]) => {
        $crate::define_plugin!(@terminal [$n] [$($i),*] [$($doc)?])
    };

    // ── @terminal: emit the PluginDescriptor ──────────────────────────────────
    (@terminal [$n:literal] [$($i:expr),* $(,)?] [$($doc:expr)?] $($meta:tt)*) => {{
        const __WREN_META: $crate::plugin::PluginMetadata =
            $crate::__wren_plugin_metadata!(@parse [$($doc)?] $($meta)*);

        fn __wren_plugin_manifest() -> $crate::plugin::PluginManifest {
            #[allow(unused_mut)]
            let mut manifest = $crate::plugin::PluginManifest::new($n);
            $( manifest.push($i); )*
            manifest
        }

        $crate::plugin::PluginDescriptor {
            api_version: $crate::plugin::WREN_PLUGIN_API_VERSION,
            name:        $n,
            manifest:    __wren_plugin_manifest,
            metadata:    __WREN_META,
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::plugin::builder::{handler, shutdown, value};
    use crate::plugin::{PluginDescriptor, PluginItem, WREN_PLUGIN_API_VERSION};

    static HELLO: PluginDescriptor = define_plugin! {
        /// Says hello.
        name: "hello",
        items: [
            handler("hello").command("hi").doc("Greets."),
            value("GREETING"),
        ],
        items: [shutdown()],
        metadata: {
            version: "9.9.9",
            desc: "Greeter.",
        },
    };

    static BARE: PluginDescriptor = define_plugin! {
        name: "bare",
    };

    #[test]
    fn test_define_plugin_items_in_order() {
        let manifest = HELLO.manifest();
        assert_eq!(manifest.name(), "hello");
        let names: Vec<&str> = manifest.items().iter().map(PluginItem::name).collect();
        assert_eq!(names, vec!["hello", "GREETING", "shutdown"]);
    }

    #[test]
    fn test_define_plugin_metadata() {
        assert_eq!(HELLO.api_version, WREN_PLUGIN_API_VERSION);
        assert_eq!(HELLO.metadata.version, "9.9.9");
        assert_eq!(HELLO.metadata.desc, "Greeter.");
        assert_eq!(HELLO.metadata.full_desc, Some(" Says hello. "));
    }

    #[test]
    fn test_define_plugin_defaults() {
        assert_eq!(BARE.metadata.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(BARE.metadata.full_desc, None);
        assert!(BARE.manifest().is_empty());
        assert!(BARE.is_compatible());
    }
}
