/// Declares a stage-level error enum whose variants wrap the individual
/// diagnostic structs of that stage.
///
/// Each variant is transparent for both `thiserror` and `miette`, so the
/// wrapped struct's message, code, labels, and source snippet surface
/// unchanged; the enum itself only adds the `From` conversions that let
/// handlers use `?` across causes.
#[macro_export]
macro_rules! declare_error_type {
    {
        #[error($msg:expr)]
        $vis:vis enum $enum_name:ident {
            $($variant:ident($cause:ty),)*
        }
    } => {
        #[derive(thiserror::Error, miette::Diagnostic, Debug)]
        #[error($msg)]
        $vis enum $enum_name {
            $(
                #[error(transparent)]
                #[diagnostic(transparent)]
                $variant(#[from] $cause),
            )*
        }
    }
}
