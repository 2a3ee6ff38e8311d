
pub use fakes::{FakeConnector, FakeDatabase, FakeScripterRunner, FakeVcs, object, proc_object};
pub use settings::{database_config, test_settings};
