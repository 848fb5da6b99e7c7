//! `BackendFacade` - the storage composition root.
//!
//! The facade owns the four entity collections and the query manager of one
//! backend session. Collaborators receive a [`BackendHandle`] when they are
//! built so they can reach their siblings through the facade without owning
//! it.
//!
//! # Example
//!
//! ```ignore
//! let backend = BackendFacade::assemble(&SqliteCollaborators::new(pool))?;
//!
//! let user = backend.users().get_or_create("jane@example.org").await?;
//! let counts = backend.query_manager().entity_counts().await?;
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

use crate::ports::{
    AuthInfoCollection, ComputerCollection, LogCollection, QueryManager, RepositoryError,
    UserCollection,
};

/// Non-owning reference from a collaborator back to its facade.
///
/// All collaborators of one facade share the same handle. It is unbound while
/// the collaborators are being constructed and bound exactly once, when the
/// facade itself exists. Holding a handle never keeps the facade alive.
#[derive(Clone, Default)]
pub struct BackendHandle {
    slot: Arc<OnceLock<Weak<BackendFacade>>>,
}

impl BackendHandle {
    /// A handle that is not attached to any facade.
    ///
    /// Collaborators built with it report [`RepositoryError::Detached`] for
    /// any operation that needs a sibling.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    /// Attach the handle to its facade. Later calls are ignored.
    fn bind(&self, backend: &Arc<BackendFacade>) {
        let _ = self.slot.set(Arc::downgrade(backend));
    }

    /// Whether the handle has been attached to a facade.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The facade, if it is bound and still alive.
    #[must_use]
    pub fn get(&self) -> Option<Arc<BackendFacade>> {
        self.slot.get().and_then(Weak::upgrade)
    }

    /// The facade, or [`RepositoryError::Detached`].
    pub fn require(&self) -> Result<Arc<BackendFacade>, RepositoryError> {
        self.get().ok_or(RepositoryError::Detached)
    }

    /// Whether this handle refers to exactly `backend`.
    #[must_use]
    pub fn points_to(&self, backend: &BackendFacade) -> bool {
        self.slot
            .get()
            .is_some_and(|weak| std::ptr::eq(weak.as_ptr(), backend))
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.slot.get() {
            None => "unbound",
            Some(weak) if weak.strong_count() > 0 => "bound",
            Some(_) => "released",
        };
        f.debug_struct("BackendHandle")
            .field("state", &state)
            .finish()
    }
}

/// Builds the collaborators of a facade.
///
/// Each method receives a clone of the handle the facade will bind once all
/// five collaborators have been built. Errors are returned to the caller of
/// [`BackendFacade::assemble`] unchanged.
pub trait CollaboratorFactory {
    type Error;

    fn logs(&self, backend: BackendHandle) -> Result<Arc<dyn LogCollection>, Self::Error>;

    fn users(&self, backend: BackendHandle) -> Result<Arc<dyn UserCollection>, Self::Error>;

    fn authinfos(
        &self,
        backend: BackendHandle,
    ) -> Result<Arc<dyn AuthInfoCollection>, Self::Error>;

    fn computers(
        &self,
        backend: BackendHandle,
    ) -> Result<Arc<dyn ComputerCollection>, Self::Error>;

    fn query_manager(&self, backend: BackendHandle)
    -> Result<Arc<dyn QueryManager>, Self::Error>;
}

/// Capability interface of a storage backend.
pub trait Backend: Send + Sync {
    fn logs(&self) -> &Arc<dyn LogCollection>;
    fn users(&self) -> &Arc<dyn UserCollection>;
    fn authinfos(&self) -> &Arc<dyn AuthInfoCollection>;
    fn computers(&self) -> &Arc<dyn ComputerCollection>;
    fn query_manager(&self) -> &Arc<dyn QueryManager>;
}

/// The backend facade.
///
/// Every collaborator is created once in [`assemble`](Self::assemble) and
/// never replaced. Accessors are plain field reads.
pub struct BackendFacade {
    logs: Arc<dyn LogCollection>,
    users: Arc<dyn UserCollection>,
    authinfos: Arc<dyn AuthInfoCollection>,
    computers: Arc<dyn ComputerCollection>,
    query_manager: Arc<dyn QueryManager>,
}

impl BackendFacade {
    /// Build all collaborators and the facade that owns them.
    ///
    /// Collaborators are created in a fixed order: logs, users, auth-infos,
    /// computers, query manager. The first failure is returned as-is and no
    /// facade is created.
    pub fn assemble<F>(factory: &F) -> Result<Arc<Self>, F::Error>
    where
        F: CollaboratorFactory + ?Sized,
    {
        let handle = BackendHandle::detached();

        let logs = factory.logs(handle.clone())?;
        let users = factory.users(handle.clone())?;
        let authinfos = factory.authinfos(handle.clone())?;
        let computers = factory.computers(handle.clone())?;
        let query_manager = factory.query_manager(handle.clone())?;

        let backend = Arc::new(Self {
            logs,
            users,
            authinfos,
            computers,
            query_manager,
        });
        handle.bind(&backend);

        Ok(backend)
    }

    /// Access the log collection.
    pub const fn logs(&self) -> &Arc<dyn LogCollection> {
        &self.logs
    }

    /// Access the user collection.
    pub const fn users(&self) -> &Arc<dyn UserCollection> {
        &self.users
    }

    /// Access the auth-info collection.
    pub const fn authinfos(&self) -> &Arc<dyn AuthInfoCollection> {
        &self.authinfos
    }

    /// Access the computer collection.
    pub const fn computers(&self) -> &Arc<dyn ComputerCollection> {
        &self.computers
    }

    /// Access the query manager.
    pub const fn query_manager(&self) -> &Arc<dyn QueryManager> {
        &self.query_manager
    }
}

impl Backend for BackendFacade {
    fn logs(&self) -> &Arc<dyn LogCollection> {
        Self::logs(self)
    }

    fn users(&self) -> &Arc<dyn UserCollection> {
        Self::users(self)
    }

    fn authinfos(&self) -> &Arc<dyn AuthInfoCollection> {
        Self::authinfos(self)
    }

    fn computers(&self) -> &Arc<dyn ComputerCollection> {
        Self::computers(self)
    }

    fn query_manager(&self) -> &Arc<dyn QueryManager> {
        Self::query_manager(self)
    }
}

impl fmt::Debug for BackendFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendFacade").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Attributes, AuthInfo, Computer, ConfiguredComputer, EntityCounts, LogEntry, LogFilter,
        LogStatistics, NewAuthInfo, NewComputer, NewLogEntry, NewUser, User,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct MockLogs {
        backend: BackendHandle,
    }

    #[async_trait]
    impl LogCollection for MockLogs {
        fn backend(&self) -> &BackendHandle {
            &self.backend
        }
        async fn create_entry(&self, _entry: NewLogEntry) -> Result<LogEntry, RepositoryError> {
            unimplemented!()
        }
        async fn get_by_id(&self, id: i64) -> Result<LogEntry, RepositoryError> {
            Err(RepositoryError::NotFound(format!("log id={id}")))
        }
        async fn find(&self, _filter: &LogFilter) -> Result<Vec<LogEntry>, RepositoryError> {
            Ok(vec![])
        }
        async fn logs_for_node(&self, _node_id: i64) -> Result<Vec<LogEntry>, RepositoryError> {
            Ok(vec![])
        }
        async fn delete(&self, _id: i64) -> Result<(), RepositoryError> {
            Ok(())
        }
        async fn delete_many(&self, _filter: &LogFilter) -> Result<u64, RepositoryError> {
            Ok(0)
        }
        async fn delete_all(&self) -> Result<u64, RepositoryError> {
            Ok(0)
        }
    }

    struct MockUsers {
        backend: BackendHandle,
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserCollection for MockUsers {
        fn backend(&self) -> &BackendHandle {
            &self.backend
        }
        async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let created = User {
                id: i64::try_from(users.len()).unwrap() + 1,
                email: user.email,
                first_name: user.first_name,
                last_name: user.last_name,
                institution: user.institution,
            };
            users.push(created.clone());
            Ok(created)
        }
        async fn get_by_id(&self, id: i64) -> Result<User, RepositoryError> {
            Err(RepositoryError::NotFound(format!("user id={id}")))
        }
        async fn get_by_email(&self, email: &str) -> Result<User, RepositoryError> {
            Err(RepositoryError::NotFound(format!("user email={email}")))
        }
        async fn get_or_create(&self, _email: &str) -> Result<(User, bool), RepositoryError> {
            unimplemented!()
        }
        async fn list(&self) -> Result<Vec<User>, RepositoryError> {
            Ok(self.users.lock().unwrap().clone())
        }
        async fn update(&self, _user: &User) -> Result<(), RepositoryError> {
            unimplemented!()
        }
        async fn delete(&self, _id: i64) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    struct MockAuthInfos {
        backend: BackendHandle,
    }

    #[async_trait]
    impl AuthInfoCollection for MockAuthInfos {
        fn backend(&self) -> &BackendHandle {
            &self.backend
        }
        async fn create(&self, _authinfo: NewAuthInfo) -> Result<AuthInfo, RepositoryError> {
            unimplemented!()
        }
        async fn get(&self, computer_id: i64, user_id: i64) -> Result<AuthInfo, RepositoryError> {
            Err(RepositoryError::NotFound(format!(
                "authinfo computer={computer_id} user={user_id}"
            )))
        }
        async fn get_by_id(&self, id: i64) -> Result<AuthInfo, RepositoryError> {
            Err(RepositoryError::NotFound(format!("authinfo id={id}")))
        }
        async fn list_for_user(&self, _user_id: i64) -> Result<Vec<AuthInfo>, RepositoryError> {
            Ok(vec![])
        }
        async fn list_for_computer(
            &self,
            _computer_id: i64,
        ) -> Result<Vec<AuthInfo>, RepositoryError> {
            Ok(vec![])
        }
        async fn set_enabled(&self, _id: i64, _enabled: bool) -> Result<(), RepositoryError> {
            Ok(())
        }
        async fn update_auth_params(
            &self,
            _id: i64,
            _auth_params: Attributes,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }
        async fn delete(&self, _id: i64) -> Result<(), RepositoryError> {
            Ok(())
        }
        async fn delete_for_computer(&self, _computer_id: i64) -> Result<u64, RepositoryError> {
            Ok(0)
        }
        async fn delete_for_user(&self, _user_id: i64) -> Result<u64, RepositoryError> {
            Ok(0)
        }
    }

    struct MockComputers {
        backend: BackendHandle,
    }

    #[async_trait]
    impl ComputerCollection for MockComputers {
        fn backend(&self) -> &BackendHandle {
            &self.backend
        }
        async fn create(&self, _computer: NewComputer) -> Result<Computer, RepositoryError> {
            unimplemented!()
        }
        async fn get_by_id(&self, id: i64) -> Result<Computer, RepositoryError> {
            Err(RepositoryError::NotFound(format!("computer id={id}")))
        }
        async fn get_by_label(&self, label: &str) -> Result<Computer, RepositoryError> {
            Err(RepositoryError::NotFound(format!("computer label={label}")))
        }
        async fn get_by_uuid(&self, uuid: Uuid) -> Result<Computer, RepositoryError> {
            Err(RepositoryError::NotFound(format!("computer uuid={uuid}")))
        }
        async fn list(&self) -> Result<Vec<Computer>, RepositoryError> {
            Ok(vec![])
        }
        async fn update(&self, _computer: &Computer) -> Result<(), RepositoryError> {
            unimplemented!()
        }
        async fn delete(&self, _id: i64) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    /// Counts users through the facade to exercise the back-reference.
    struct MockQueryManager {
        backend: BackendHandle,
    }

    #[async_trait]
    impl QueryManager for MockQueryManager {
        fn backend(&self) -> &BackendHandle {
            &self.backend
        }
        async fn entity_counts(&self) -> Result<EntityCounts, RepositoryError> {
            let backend = self.backend.require()?;
            let users = backend.users().list().await?;
            Ok(EntityCounts {
                users: i64::try_from(users.len()).unwrap(),
                ..EntityCounts::default()
            })
        }
        async fn log_statistics(
            &self,
            _node_id: Option<i64>,
        ) -> Result<LogStatistics, RepositoryError> {
            Ok(LogStatistics::default())
        }
        async fn computers_for_user(
            &self,
            email: &str,
        ) -> Result<Vec<ConfiguredComputer>, RepositoryError> {
            self.backend.require()?.users().get_by_email(email).await?;
            Ok(vec![])
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ConstructionFailed(&'static str);

    #[derive(Default)]
    struct MockFactory {
        fail_on: Option<&'static str>,
        calls: Mutex<Vec<&'static str>>,
        handle_bound_during_construction: Mutex<Vec<bool>>,
    }

    impl MockFactory {
        fn failing_on(name: &'static str) -> Self {
            Self {
                fail_on: Some(name),
                ..Self::default()
            }
        }

        fn record(
            &self,
            name: &'static str,
            backend: &BackendHandle,
        ) -> Result<(), ConstructionFailed> {
            self.calls.lock().unwrap().push(name);
            self.handle_bound_during_construction
                .lock()
                .unwrap()
                .push(backend.is_bound());
            if self.fail_on == Some(name) {
                return Err(ConstructionFailed(name));
            }
            Ok(())
        }
    }

    impl CollaboratorFactory for MockFactory {
        type Error = ConstructionFailed;

        fn logs(&self, backend: BackendHandle) -> Result<Arc<dyn LogCollection>, Self::Error> {
            self.record("logs", &backend)?;
            Ok(Arc::new(MockLogs { backend }))
        }

        fn users(&self, backend: BackendHandle) -> Result<Arc<dyn UserCollection>, Self::Error> {
            self.record("users", &backend)?;
            Ok(Arc::new(MockUsers {
                backend,
                users: Mutex::new(vec![]),
            }))
        }

        fn authinfos(
            &self,
            backend: BackendHandle,
        ) -> Result<Arc<dyn AuthInfoCollection>, Self::Error> {
            self.record("authinfos", &backend)?;
            Ok(Arc::new(MockAuthInfos { backend }))
        }

        fn computers(
            &self,
            backend: BackendHandle,
        ) -> Result<Arc<dyn ComputerCollection>, Self::Error> {
            self.record("computers", &backend)?;
            Ok(Arc::new(MockComputers { backend }))
        }

        fn query_manager(
            &self,
            backend: BackendHandle,
        ) -> Result<Arc<dyn QueryManager>, Self::Error> {
            self.record("query_manager", &backend)?;
            Ok(Arc::new(MockQueryManager { backend }))
        }
    }

    #[test]
    fn test_accessors_are_identity_stable() {
        let backend = BackendFacade::assemble(&MockFactory::default()).unwrap();

        assert!(Arc::ptr_eq(backend.logs(), backend.logs()));
        assert!(Arc::ptr_eq(backend.users(), backend.users()));
        assert!(Arc::ptr_eq(backend.authinfos(), backend.authinfos()));
        assert!(Arc::ptr_eq(backend.computers(), backend.computers()));
        assert!(Arc::ptr_eq(
            backend.query_manager(),
            backend.query_manager()
        ));
    }

    #[test]
    fn test_collaborators_point_back_to_their_facade() {
        let backend = BackendFacade::assemble(&MockFactory::default()).unwrap();

        assert!(backend.logs().backend().points_to(&backend));
        assert!(backend.users().backend().points_to(&backend));
        assert!(backend.authinfos().backend().points_to(&backend));
        assert!(backend.computers().backend().points_to(&backend));
        assert!(backend.query_manager().backend().points_to(&backend));

        let upgraded = backend.logs().backend().get().unwrap();
        assert!(Arc::ptr_eq(&upgraded, &backend));
    }

    #[test]
    fn test_handles_do_not_cross_facades() {
        let first = BackendFacade::assemble(&MockFactory::default()).unwrap();
        let second = BackendFacade::assemble(&MockFactory::default()).unwrap();

        assert!(!first.logs().backend().points_to(&second));
        assert!(!second.users().backend().points_to(&first));
    }

    #[test]
    fn test_construction_order_and_unbound_handle() {
        let factory = MockFactory::default();
        let _backend = BackendFacade::assemble(&factory).unwrap();

        assert_eq!(
            *factory.calls.lock().unwrap(),
            vec!["logs", "users", "authinfos", "computers", "query_manager"]
        );
        assert!(
            factory
                .handle_bound_during_construction
                .lock()
                .unwrap()
                .iter()
                .all(|bound| !bound)
        );
    }

    #[test]
    fn test_constructor_failure_propagates_unchanged() {
        let factory = MockFactory::failing_on("computers");
        let err = BackendFacade::assemble(&factory).unwrap_err();

        assert_eq!(err, ConstructionFailed("computers"));
        // Nothing after the failing collaborator is built.
        assert_eq!(
            *factory.calls.lock().unwrap(),
            vec!["logs", "users", "authinfos", "computers"]
        );
    }

    #[test]
    fn test_back_reference_does_not_keep_facade_alive() {
        let backend = BackendFacade::assemble(&MockFactory::default()).unwrap();
        let logs = Arc::clone(backend.logs());
        drop(backend);

        assert!(logs.backend().is_bound());
        assert!(logs.backend().get().is_none());
        assert!(matches!(
            logs.backend().require(),
            Err(RepositoryError::Detached)
        ));
        assert_eq!(format!("{:?}", logs.backend()), "BackendHandle { state: \"released\" }");
    }

    #[test]
    fn test_detached_handle() {
        let handle = BackendHandle::detached();
        assert!(!handle.is_bound());
        assert!(handle.get().is_none());
        assert!(matches!(handle.require(), Err(RepositoryError::Detached)));
    }

    #[tokio::test]
    async fn test_collaborator_reaches_sibling_through_facade() {
        let backend = BackendFacade::assemble(&MockFactory::default()).unwrap();
        backend
            .users()
            .create(NewUser::with_email("jane@example.org"))
            .await
            .unwrap();

        let counts = backend.query_manager().entity_counts().await.unwrap();
        assert_eq!(counts.users, 1);

        let missing = backend
            .query_manager()
            .computers_for_user("nobody@example.org")
            .await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_facade_usable_through_backend_trait() {
        let backend: Arc<dyn Backend> = BackendFacade::assemble(&MockFactory::default()).unwrap();
        let logs = backend.logs().find(&LogFilter::default()).await.unwrap();
        assert!(logs.is_empty());
    }
}
