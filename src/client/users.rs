use super::{TidyDnsClient, duplicate_key_message};
use crate::error::{Conflict, Result};
use crate::transport::{Form, Transport};
use crate::types::{NewUser, UserAccount, UserAllowId, UserId, UserUpdate};
use crate::wire::{self, UserAck, UserRow};

/// `user_allow` values; an empty list is sent as one empty value, which the
/// service reads as "no restriction".
fn push_user_allow(form: &mut Form, ids: &[UserAllowId]) {
    if ids.is_empty() {
        form.push("user_allow", "");
    }
    for id in ids {
        form.push("user_allow", id);
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

impl<T: Transport> TidyDnsClient<T> {
    pub async fn create_user(&self, user: &NewUser) -> Result<UserId> {
        let mut form = Form::new()
            .field("username", &user.username)
            .field("epassword", &user.password)
            .field("epassword_verify", &user.password)
            .field(
                "change_password_on_first_login",
                flag(user.force_password_change),
            )
            .field("description", &user.description)
            .field("auth_group", user.auth_group.code());
        push_user_allow(&mut form, &user.allowed_ids);

        let res = self
            .send_detecting_conflict(
                self.post("/=/user/new", form),
                &duplicate_key_message("username", &user.username),
                Conflict::DuplicateUsername(user.username.clone()),
            )
            .await?;

        let ack: UserAck = wire::decode("user create", &res.body)?;
        Ok(ack.data.id)
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<UserAccount> {
        let row: UserRow = self
            .get_json("user", &format!("/=/user/{user_id}"), &[])
            .await?;
        UserAccount::try_from(row)
    }

    /// Send only the fields set in `update`.
    pub async fn update_user(&self, user_id: UserId, update: &UserUpdate) -> Result<()> {
        let mut form = Form::new();
        if let Some(password) = &update.password {
            form.push("epassword", password);
            form.push("epassword_verify", password);
        }
        if let Some(description) = &update.description {
            form.push("description", description);
        }
        if let Some(group) = update.auth_group {
            form.push("auth_group", group.code());
        }
        if let Some(ids) = &update.allowed_ids {
            push_user_allow(&mut form, ids);
        }

        let res = self
            .send_ok(self.post(&format!("/=/user/{user_id}"), form))
            .await?;
        let _: UserAck = wire::decode("user update", &res.body)?;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: UserId) -> Result<()> {
        self.send_ok(self.delete(&format!("/=/user/{user_id}")))
            .await?;
        Ok(())
    }
}
