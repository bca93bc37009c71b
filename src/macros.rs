#[cfg(feature = "tracing")]
macro_rules! tltrace {
    ($($tt:tt)*) => {
        tracing::trace!(target: "treeline", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! tltrace {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! tldebug {
    ($($tt:tt)*) => {
        tracing::debug!(target: "treeline", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! tldebug {
    ($($tt:tt)*) => {};
}

#[cfg(feature = "tracing")]
macro_rules! tlwarn {
    ($($tt:tt)*) => {
        tracing::warn!(target: "treeline", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! tlwarn {
    ($($tt:tt)*) => {};
}
