//! Object-safe view of every client operation, for callers that want to
//! substitute a fake service in their own tests.
use async_trait::async_trait;

use crate::client::TidyDnsClient;
use crate::error::Result;
use crate::transport::Transport;
use crate::types::*;

#[async_trait]
pub trait TidyDnsApi: Send + Sync {
    async fn resolve_subnet(&self, cidr: &str) -> Result<SubnetIdentity>;
    async fn allocate_free_ip(&self, subnet_id: SubnetId) -> Result<String>;
    async fn create_interface(&self, info: &InterfaceCreateRequest) -> Result<InterfaceId>;
    async fn read_interface(&self, interface_id: InterfaceId) -> Result<InterfaceInfo>;
    async fn rename_interface(&self, interface_id: InterfaceId, name: &str) -> Result<InterfaceId>;
    async fn delete_interface(&self, interface_id: InterfaceId) -> Result<()>;

    async fn list_zones(&self) -> Result<Vec<Zone>>;
    async fn find_zone_id(&self, name: &str) -> Result<ZoneId>;

    async fn create_record(&self, zone_id: ZoneId, input: &RecordInput) -> Result<RecordId>;
    async fn update_record(
        &self,
        zone_id: ZoneId,
        record_id: RecordId,
        input: &RecordInput,
    ) -> Result<()>;
    async fn read_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<Record>;
    async fn find_record(
        &self,
        zone_id: ZoneId,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<Record>>;
    async fn list_records(&self, zone_id: ZoneId) -> Result<Vec<Record>>;
    async fn delete_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<()>;

    async fn create_user(&self, user: &NewUser) -> Result<UserId>;
    async fn get_user(&self, user_id: UserId) -> Result<UserAccount>;
    async fn update_user(&self, user_id: UserId, update: &UserUpdate) -> Result<()>;
    async fn delete_user(&self, user_id: UserId) -> Result<()>;
}

#[async_trait]
impl<T: Transport> TidyDnsApi for TidyDnsClient<T> {
    async fn resolve_subnet(&self, cidr: &str) -> Result<SubnetIdentity> {
        TidyDnsClient::resolve_subnet(self, cidr).await
    }

    async fn allocate_free_ip(&self, subnet_id: SubnetId) -> Result<String> {
        TidyDnsClient::allocate_free_ip(self, subnet_id).await
    }

    async fn create_interface(&self, info: &InterfaceCreateRequest) -> Result<InterfaceId> {
        TidyDnsClient::create_interface(self, info).await
    }

    async fn read_interface(&self, interface_id: InterfaceId) -> Result<InterfaceInfo> {
        TidyDnsClient::read_interface(self, interface_id).await
    }

    async fn rename_interface(
        &self,
        interface_id: InterfaceId,
        name: &str,
    ) -> Result<InterfaceId> {
        TidyDnsClient::rename_interface(self, interface_id, name).await
    }

    async fn delete_interface(&self, interface_id: InterfaceId) -> Result<()> {
        TidyDnsClient::delete_interface(self, interface_id).await
    }

    async fn list_zones(&self) -> Result<Vec<Zone>> {
        TidyDnsClient::list_zones(self).await
    }

    async fn find_zone_id(&self, name: &str) -> Result<ZoneId> {
        TidyDnsClient::find_zone_id(self, name).await
    }

    async fn create_record(&self, zone_id: ZoneId, input: &RecordInput) -> Result<RecordId> {
        TidyDnsClient::create_record(self, zone_id, input).await
    }

    async fn update_record(
        &self,
        zone_id: ZoneId,
        record_id: RecordId,
        input: &RecordInput,
    ) -> Result<()> {
        TidyDnsClient::update_record(self, zone_id, record_id, input).await
    }

    async fn read_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<Record> {
        TidyDnsClient::read_record(self, zone_id, record_id).await
    }

    async fn find_record(
        &self,
        zone_id: ZoneId,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<Record>> {
        TidyDnsClient::find_record(self, zone_id, name, record_type).await
    }

    async fn list_records(&self, zone_id: ZoneId) -> Result<Vec<Record>> {
        TidyDnsClient::list_records(self, zone_id).await
    }

    async fn delete_record(&self, zone_id: ZoneId, record_id: RecordId) -> Result<()> {
        TidyDnsClient::delete_record(self, zone_id, record_id).await
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserId> {
        TidyDnsClient::create_user(self, user).await
    }

    async fn get_user(&self, user_id: UserId) -> Result<UserAccount> {
        TidyDnsClient::get_user(self, user_id).await
    }

    async fn update_user(&self, user_id: UserId, update: &UserUpdate) -> Result<()> {
        TidyDnsClient::update_user(self, user_id, update).await
    }

    async fn delete_user(&self, user_id: UserId) -> Result<()> {
        TidyDnsClient::delete_user(self, user_id).await
    }
}
