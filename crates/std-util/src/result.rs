/// Unwraps an `Ok`, panicking with the error (and an optional formatted
/// context) otherwise.
#[macro_export]
macro_rules! assert_ok {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Ok(value) => value,
            Err(err) => {
                let context: Option<String> = None $( .or(Some(format!($($t)*))) )?;
                match context {
                    Some(context) => panic!("expected `Ok`; err={err:?}, {context}"),
                    None => panic!("expected `Ok`; err={err:?}"),
                }
            }
        }
    };
}

/// Unwraps an `Err`, returning the error for further inspection.
#[macro_export]
macro_rules! assert_err {
    ($e:expr $(, $($t:tt)* )?) => {
        match $e {
            Err(err) => err,
            Ok(_) => {
                let context: Option<String> = None $( .or(Some(format!($($t)*))) )?;
                match context {
                    Some(context) => panic!("expected `Err`; got `Ok`, {context}"),
                    None => panic!("expected `Err`; got `Ok`"),
                }
            }
        }
    };
}
