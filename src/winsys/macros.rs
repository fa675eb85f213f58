#[macro_export]
macro_rules! map(
    { $($key:expr => $val:expr),+ $(,)? } => {
        {
            let mut map = ::std::collections::HashMap::with_capacity(
                [$(stringify!($key)),+].len()
            );
            $(
                map.insert($key, $val);
            )+
            map
        }
    };
);
