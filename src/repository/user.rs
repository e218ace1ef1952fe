use diesel::prelude::*;

use crate::domain::types::{UserId, Username};
use crate::domain::user::{NewUser, ProfilePatch, User};
use crate::models::user::{
    NewUser as DbNewUser, ProfilePatch as DbProfilePatch, User as DbUser,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserReader, UserWriter};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::id.eq(id.get()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }

    fn get_user_by_username(&self, username: &Username) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let user = users::table
            .filter(users::username.eq(username.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        let user = user.map(TryInto::try_into).transpose()?;
        Ok(user)
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_user: DbNewUser = user.clone().into();

        let created = diesel::insert_into(users::table)
            .values(db_user)
            .get_result::<DbUser>(&mut conn)?;

        Ok(created.try_into()?)
    }

    fn update_profile(&self, id: UserId, patch: &ProfilePatch) -> RepositoryResult<usize> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_patch: DbProfilePatch = patch.clone().into();

        let affected = diesel::update(users::table.filter(users::id.eq(id.get())))
            .set(db_patch)
            .execute(&mut conn)?;

        Ok(affected)
    }
}
