//! Terse argument-list construction.

/// Builds an [`Args`](crate::cmd::Args) list. Braces group named options the
/// way a mapping would; every other item goes through `Arg::from`.
///
/// ```
/// use gitcmd::git_args;
/// let args = git_args!["commit", { "-m" => "msg", "--author" => None::<&str> }, "--quiet"];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! git_args {
    (@acc $a:ident;) => {};
    (@acc $a:ident; { $( $k:expr => $v:expr ),* $(,)? } $(, $($rest:tt)*)?) => {
        $( $a.push($crate::cmd::Arg::opt($k, $v)); )*
        $crate::git_args!(@acc $a; $($($rest)*)?);
    };
    (@acc $a:ident; $v:expr $(, $($rest:tt)*)?) => {
        $a.push($crate::cmd::Arg::from($v));
        $crate::git_args!(@acc $a; $($($rest)*)?);
    };
    () => { $crate::cmd::Args::new() };
    ( $($items:tt)+ ) => {{
        let mut __args = $crate::cmd::Args::new();
        $crate::git_args!(@acc __args; $($items)+);
        __args
    }};
}
