use std::collections::BTreeSet;

use cadet_shared::{Id, NewUser, Role, User, Validate};

use crate::error::{Result, StoreError};
use crate::password::{hash_password, verify_password};
use crate::store::Store;

impl Store {
    /// Create an account. Username and email must both be unused.
    pub fn register_user(&mut self, new: NewUser) -> Result<User> {
        self.check_new_user(&new)?;
        let password_hash = hash_password(&new.password)?;
        Ok(self.insert_user(new, password_hash))
    }

    /// Same as [`Store::register_user`] with the password already hashed by
    /// [`hash_password`], so callers can hash before taking a lock on the store.
    pub fn register_user_with_hash(&mut self, new: NewUser, password_hash: String) -> Result<User> {
        self.check_new_user(&new)?;
        Ok(self.insert_user(new, password_hash))
    }

    fn check_new_user(&self, new: &NewUser) -> Result<()> {
        new.validate()?;
        if self.get_user_by_username(&new.username).is_some() {
            return Err(StoreError::DuplicateUsername);
        }
        if self.get_user_by_email(&new.email).is_some() {
            return Err(StoreError::DuplicateEmail);
        }
        Ok(())
    }

    /// Insert without checks. `password_hash` must already be a PHC string.
    pub(crate) fn insert_user(&mut self, new: NewUser, password_hash: String) -> User {
        let user = self
            .users
            .insert_with(|id| User {
                id,
                username: new.username,
                password_hash,
                email: new.email,
                first_name: new.first_name,
                last_name: new.last_name,
                role: new.role,
                profile_image: new.profile_image,
            })
            .clone();

        tracing::debug!(id = user.id, username = %user.username, role = %user.role, "user created");
        user
    }

    /// Look up a user by username and check the password against the stored
    /// salted hash.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<&User> {
        self.get_user_by_username(username)
            .filter(|user| verify_password(password, &user.password_hash))
    }

    pub fn get_user(&self, id: Id) -> Option<&User> {
        self.users.get(id)
    }

    pub fn get_user_by_username(&self, username: &str) -> Option<&User> {
        self.users.values().find(|u| u.username == username)
    }

    pub fn get_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    pub fn instructors(&self) -> Vec<&User> {
        self.users_with_role(Role::Instructor)
    }

    pub fn students(&self) -> Vec<&User> {
        self.users_with_role(Role::Student)
    }

    fn users_with_role(&self, role: Role) -> Vec<&User> {
        self.users.values().filter(|u| u.role == role).collect()
    }

    /// Students who share at least one flight log or booking with the
    /// instructor. Each student appears once, in id order.
    pub fn students_by_instructor(&self, instructor_id: Id) -> Vec<&User> {
        let from_logs = self
            .flight_logs
            .values()
            .filter(|log| log.instructor_id == Some(instructor_id))
            .map(|log| log.student_id);
        let from_bookings = self
            .bookings
            .values()
            .filter(|b| b.instructor_id == Some(instructor_id))
            .map(|b| b.student_id);

        let ids: BTreeSet<Id> = from_logs.chain(from_bookings).collect();
        ids.into_iter().filter_map(|id| self.users.get(id)).collect()
    }
}
