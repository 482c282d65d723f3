use std::sync::Arc;

use super::{AccessDecision, AccessGate, AccessTarget, Actor, DenialReason, Operation};
use crate::errors::Result;
use crate::models::users::UserRole;
use crate::storage::Storage;

/// 基于班级归属与选课记录的访问检查
///
/// - 教师：只能操作自己任课班级（或自己布置的作业）
/// - 学生：只能在处于 active 选课状态的班级中查看与提交
/// - 家长：无权限
pub struct ClassMembershipGate {
    storage: Arc<dyn Storage>,
}

impl ClassMembershipGate {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn owns_class(&self, actor_id: i64, class_id: i64) -> Result<bool> {
        Ok(self
            .storage
            .get_class_by_id(class_id)
            .await?
            .is_some_and(|c| c.teacher_id == actor_id))
    }

    async fn is_active_student(&self, user_id: i64, class_id: i64) -> Result<bool> {
        Ok(self
            .storage
            .get_class_user(class_id, user_id)
            .await?
            .is_some_and(|cu| cu.is_active_student()))
    }

    /// 教师是否管理该资源：作业布置者或班级任课教师
    async fn manages(&self, actor: &Actor, target: AccessTarget) -> Result<bool> {
        if matches!(target, AccessTarget::Assignment { owner_id, .. } if owner_id == actor.id) {
            return Ok(true);
        }
        self.owns_class(actor.id, target.class_id()).await
    }

    async fn teacher_only(&self, actor: &Actor, target: AccessTarget) -> Result<AccessDecision> {
        if actor.role != UserRole::Teacher {
            return Ok(AccessDecision::Deny(DenialReason::InsufficientRole));
        }
        if self.manages(actor, target).await? {
            Ok(AccessDecision::Allow)
        } else {
            Ok(AccessDecision::Deny(DenialReason::NotOwner))
        }
    }
}

#[async_trait::async_trait]
impl AccessGate for ClassMembershipGate {
    async fn check(
        &self,
        actor: &Actor,
        operation: Operation,
        target: AccessTarget,
    ) -> Result<AccessDecision> {
        if actor.role.is_admin() {
            return Ok(AccessDecision::Allow);
        }

        match operation {
            Operation::CreateAssignment
            | Operation::UpdateAssignment
            | Operation::DeleteAssignment
            | Operation::GradeSubmission
            | Operation::ViewReport => self.teacher_only(actor, target).await,

            Operation::ViewAssignment => match actor.role {
                UserRole::Teacher => self.teacher_only(actor, target).await,
                UserRole::Student => {
                    if self.is_active_student(actor.id, target.class_id()).await? {
                        Ok(AccessDecision::Allow)
                    } else {
                        Ok(AccessDecision::Deny(DenialReason::NotEnrolled))
                    }
                }
                _ => Ok(AccessDecision::Deny(DenialReason::InsufficientRole)),
            },

            Operation::SubmitAssignment => {
                if actor.role != UserRole::Student {
                    return Ok(AccessDecision::Deny(DenialReason::InsufficientRole));
                }
                if self.is_active_student(actor.id, target.class_id()).await? {
                    Ok(AccessDecision::Allow)
                } else {
                    Ok(AccessDecision::Deny(DenialReason::NotEnrolled))
                }
            }

            Operation::ViewStudentSummary => match (actor.role, target) {
                (UserRole::Student, AccessTarget::Student { student_id, .. }) => {
                    if student_id == actor.id {
                        Ok(AccessDecision::Allow)
                    } else {
                        Ok(AccessDecision::Deny(DenialReason::NotOwner))
                    }
                }
                (UserRole::Teacher, _) => self.teacher_only(actor, target).await,
                _ => Ok(AccessDecision::Deny(DenialReason::InsufficientRole)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::class_users::EnrollmentStatus;
    use crate::test_support::{enroll, seed_class, seed_user, storage};

    async fn gate() -> (ClassMembershipGate, i64, i64, i64, i64, i64) {
        let storage = storage().await;
        let owner = seed_user(&storage, "owner", UserRole::Teacher).await;
        let other = seed_user(&storage, "other", UserRole::Teacher).await;
        let student = seed_user(&storage, "student", UserRole::Student).await;
        let dropped = seed_user(&storage, "dropped", UserRole::Student).await;
        let class_id = seed_class(&storage, owner).await;
        enroll(&storage, class_id, student, EnrollmentStatus::Active).await;
        enroll(&storage, class_id, dropped, EnrollmentStatus::Inactive).await;

        let gate = ClassMembershipGate::new(Arc::new(storage));
        (gate, owner, other, student, dropped, class_id)
    }

    #[tokio::test]
    async fn test_admin_always_passes() {
        let (gate, _, _, _, _, class_id) = gate().await;
        let admin = Actor::new(999, UserRole::Admin);
        for op in [
            Operation::CreateAssignment,
            Operation::SubmitAssignment,
            Operation::ViewReport,
        ] {
            let decision = gate
                .check(&admin, op, AccessTarget::Class(class_id))
                .await
                .unwrap();
            assert_eq!(decision, AccessDecision::Allow);
        }
    }

    #[tokio::test]
    async fn test_teacher_ownership() {
        let (gate, owner, other, _, _, class_id) = gate().await;
        let target = AccessTarget::Class(class_id);

        let allowed = gate
            .check(&Actor::new(owner, UserRole::Teacher), Operation::CreateAssignment, target)
            .await
            .unwrap();
        assert!(allowed.is_allowed());

        let denied = gate
            .check(&Actor::new(other, UserRole::Teacher), Operation::CreateAssignment, target)
            .await
            .unwrap();
        assert_eq!(denied, AccessDecision::Deny(DenialReason::NotOwner));
    }

    #[tokio::test]
    async fn test_assignment_owner_passes_even_without_class() {
        let (gate, _, other, _, _, class_id) = gate().await;
        let target = AccessTarget::Assignment {
            class_id,
            owner_id: other,
        };
        let decision = gate
            .check(&Actor::new(other, UserRole::Teacher), Operation::UpdateAssignment, target)
            .await
            .unwrap();
        assert!(decision.is_allowed());
    }

    #[tokio::test]
    async fn test_student_roles() {
        let (gate, _, _, student, dropped, class_id) = gate().await;
        let target = AccessTarget::Class(class_id);

        let decision = gate
            .check(&Actor::new(student, UserRole::Student), Operation::CreateAssignment, target)
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::Deny(DenialReason::InsufficientRole));

        let decision = gate
            .check(&Actor::new(student, UserRole::Student), Operation::SubmitAssignment, target)
            .await
            .unwrap();
        assert!(decision.is_allowed());

        let decision = gate
            .check(&Actor::new(dropped, UserRole::Student), Operation::SubmitAssignment, target)
            .await
            .unwrap();
        assert_eq!(decision, AccessDecision::Deny(DenialReason::NotEnrolled));
    }

    #[tokio::test]
    async fn test_student_summary_self_only() {
        let (gate, owner, _, student, dropped, class_id) = gate().await;
        let target = AccessTarget::Student {
            class_id,
            student_id: student,
        };

        let own = gate
            .check(&Actor::new(student, UserRole::Student), Operation::ViewStudentSummary, target)
            .await
            .unwrap();
        assert!(own.is_allowed());

        let peer = gate
            .check(&Actor::new(dropped, UserRole::Student), Operation::ViewStudentSummary, target)
            .await
            .unwrap();
        assert_eq!(peer, AccessDecision::Deny(DenialReason::NotOwner));

        let teacher = gate
            .check(&Actor::new(owner, UserRole::Teacher), Operation::ViewStudentSummary, target)
            .await
            .unwrap();
        assert!(teacher.is_allowed());

        let parent = gate
            .check(&Actor::new(7, UserRole::Parent), Operation::ViewStudentSummary, target)
            .await
            .unwrap();
        assert_eq!(parent, AccessDecision::Deny(DenialReason::InsufficientRole));
    }
}
